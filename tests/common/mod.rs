#![allow(dead_code)]

use base64::prelude::*;
use songtag_lib::{
    Capture, CommandRunner, Invocation, ProcessorConfig, ToolError, ToolOutput,
};
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub const IMAGINE: &str = r#"{"track":{"title":"Imagine","subtitle":"John Lennon"}}"#;

/// What the fake trimming tool does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimBehavior {
    /// Writes the destination file and exits 0
    Succeed,
    /// Exits 1 without writing anything
    Fail,
    /// Exits 0 but never writes the destination
    NoOutput,
}

#[derive(Debug, Clone)]
pub struct Script {
    pub trim: TrimBehavior,
    pub probed_duration: String,
    /// Raw recognizer stdout, or stderr of a failing run
    pub recognition: Result<String, String>,
    pub tag_fails: bool,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            trim: TrimBehavior::Succeed,
            probed_duration: "45.000000\n".to_string(),
            recognition: Ok(IMAGINE.to_string()),
            tag_fails: false,
        }
    }
}

/// Stands in for ffmpeg, ffprobe, songrec and kid3-cli and records every
/// invocation it sees.
pub struct ScriptedRunner {
    script: Script,
    calls: Mutex<Vec<Invocation>>,
    /// Probe outputs used, in order, before falling back to the script
    probe_queue: Mutex<VecDeque<String>>,
}

impl ScriptedRunner {
    pub fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            calls: Mutex::new(Vec::new()),
            probe_queue: Mutex::new(VecDeque::new()),
        })
    }

    /// Make the next probe report `duration` instead of the scripted one
    pub fn queue_probe(&self, duration: &str) {
        self.probe_queue
            .lock()
            .unwrap()
            .push_back(duration.to_string());
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    pub fn programs(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.program).collect()
    }

    pub fn calls_to(&self, program: &str) -> Vec<Invocation> {
        self.calls()
            .into_iter()
            .filter(|c| c.program == program)
            .collect()
    }

    fn respond(&self, invocation: &Invocation) -> ToolOutput {
        match invocation.program.as_str() {
            "ffmpeg" => match self.script.trim {
                TrimBehavior::Succeed => {
                    let destination = invocation.args.last().unwrap();
                    fs::write(destination, b"ID3 trimmed").unwrap();
                    ToolOutput::ok("")
                }
                TrimBehavior::Fail => ToolOutput::failed(1, "Invalid data found when processing input"),
                TrimBehavior::NoOutput => ToolOutput::ok(""),
            },
            "ffprobe" => {
                let queued = self.probe_queue.lock().unwrap().pop_front();
                ToolOutput::ok(queued.unwrap_or_else(|| self.script.probed_duration.clone()))
            }
            "songrec" => match &self.script.recognition {
                Ok(stdout) => ToolOutput::ok(capture(invocation, stdout.as_bytes())),
                Err(stderr) => ToolOutput::failed(1, stderr.clone()),
            },
            "kid3-cli" if self.script.tag_fails => ToolOutput::failed(2, "cannot write file"),
            "kid3-cli" => ToolOutput::ok(""),
            other => panic!("unexpected program {other}"),
        }
    }
}

fn capture(invocation: &Invocation, bytes: &[u8]) -> String {
    match invocation.capture {
        Capture::Text => String::from_utf8_lossy(bytes).into_owned(),
        Capture::Base64 => BASE64_STANDARD.encode(bytes),
    }
}

impl CommandRunner for ScriptedRunner {
    async fn run(&self, invocation: &Invocation) -> Result<ToolOutput, ToolError> {
        self.calls.lock().unwrap().push(invocation.clone());
        Ok(self.respond(invocation))
    }
}

pub fn config(scratch_dir: &Path, trim_enabled: bool) -> Arc<ProcessorConfig> {
    Arc::new(
        ProcessorConfig::default()
            .with_scratch_dir(scratch_dir.to_path_buf())
            .with_trim(trim_enabled)
            .with_trim_window(55, 45),
    )
}

/// Create an (empty) source file named `name` in `dir`
pub fn source_file(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, b"").unwrap();
    path
}

pub fn scratch_entries(dir: &Path) -> Vec<PathBuf> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    entries.sort();
    entries
}
