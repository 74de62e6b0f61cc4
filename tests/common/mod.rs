//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use fsvs_apt_hook::HookConfig;
use fsvs_apt_hook::error::HookError;
use fsvs_apt_hook::hook::prompt::{Confirmer, is_affirmative};

/// A stand-in for the fsvs binary: a shell script with canned answers that
/// records every invocation.
pub struct FakeFsvs {
    pub dir: tempfile::TempDir,
    pub urls: String,
    pub remote_exit: i32,
    pub status: String,
    pub commit_exit: i32,
}

impl FakeFsvs {
    /// A healthy working copy with one configured URL and no changes.
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp directory"),
            urls: "name:,prio:0,target:HEAD,ro:0,svn://backup/etc".to_string(),
            remote_exit: 0,
            status: String::new(),
            commit_exit: 0,
        }
    }

    pub fn with_urls(mut self, urls: &str) -> Self {
        self.urls = urls.to_string();
        self
    }

    pub fn with_remote_exit(mut self, code: i32) -> Self {
        self.remote_exit = code;
        self
    }

    pub fn with_status(mut self, status: &str) -> Self {
        self.status = status.to_string();
        self
    }

    pub fn with_commit_exit(mut self, code: i32) -> Self {
        self.commit_exit = code;
        self
    }

    pub fn binary(&self) -> PathBuf {
        self.dir.path().join("fsvs")
    }

    pub fn calls_path(&self) -> PathBuf {
        self.dir.path().join("calls")
    }

    /// Copy of the message file taken when commit ran.
    pub fn committed_message_path(&self) -> PathBuf {
        self.dir.path().join("committed_message")
    }

    /// Write the script and return a config pointing at it.
    pub fn install(&self, log: &Path, message_file: &Path) -> HookConfig {
        fs::write(self.dir.path().join("urls"), &self.urls).expect("Failed to write urls");
        fs::write(self.dir.path().join("status"), &self.status).expect("Failed to write status");

        let script = format!(
            r#"#!/bin/sh
dir="{dir}"
echo "$*" >> "$dir/calls"
case "$*" in
  *"urls dump") cat "$dir/urls" ;;
  *remote-status) exit {remote_exit} ;;
  status\ *) cat "$dir/status" ;;
  commit\ *) cp "$4" "$dir/committed_message"; exit {commit_exit} ;;
  *) exit 99 ;;
esac
"#,
            dir = self.dir.path().display(),
            remote_exit = self.remote_exit,
            commit_exit = self.commit_exit,
        );

        let path = self.binary();
        fs::write(&path, script).expect("Failed to write fake fsvs");
        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).unwrap();

        HookConfig {
            log_path: log.to_path_buf(),
            vcs_binary: path.to_string_lossy().into_owned(),
            tracked_root: PathBuf::from("/"),
            message_file: message_file.to_path_buf(),
            message_prefix: "fsvs-apt-hook_".to_string(),
        }
    }

    /// Every invocation, one argument string per call.
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.calls_path())
            .unwrap_or_default()
            .lines()
            .map(String::from)
            .collect()
    }

    pub fn commit_calls(&self) -> usize {
        self.calls().iter().filter(|c| c.starts_with("commit ")).count()
    }
}

/// Answers every question with a fixed operator reply.
pub struct Answer(pub &'static str);

impl Confirmer for Answer {
    fn confirm(&self, _question: &str) -> Result<bool, HookError> {
        Ok(is_affirmative(self.0))
    }
}

/// Write `content` as a transaction log in `dir`.
pub fn write_log(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("term.log");
    fs::write(&path, content).expect("Failed to write log");
    path
}
