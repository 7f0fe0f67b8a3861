//! Command helper methods for Test.

use super::{Test, User};
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// A kanuka command run by `user` inside the project.
    ///
    /// HOME is the user's temp home so generated keys land there.
    pub fn cmd_as(&self, user: &User) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("kanuka").expect("failed to find kanuka binary");
        cmd.env("HOME", user.home.path());
        // Windows uses USERPROFILE instead of HOME
        cmd.env("USERPROFILE", user.home.path());
        cmd.env_remove("XDG_DATA_HOME");
        cmd.env_remove("KANUKA_LOG");
        cmd.env("NO_COLOR", "1");
        cmd.env("KANUKA_USER", &user.id);
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// A kanuka command run by alice.
    pub fn cmd(&self) -> Command {
        self.cmd_as(&self.alice)
    }

    /// Run `kanuka <args>` as alice.
    pub fn run(&self, args: &[&str]) -> Output {
        self.run_as(&self.alice, args)
    }

    /// Run `kanuka <args>` as `user`.
    pub fn run_as(&self, user: &User, args: &[&str]) -> Output {
        self.cmd_as(user)
            .args(args)
            .output()
            .expect("failed to run kanuka")
    }

    /// Register `user` and have alice grant them access.
    pub fn admit(&self, user: &User) {
        super::assert_success(&self.run_as(user, &["create", "--name", &user.id]));
        super::assert_success(&self.run(&["sync"]));
    }
}
