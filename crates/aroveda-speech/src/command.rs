//! Speech backends that delegate to external programs.
//!
//! The synthesizer keeps at most one child process alive; starting a new
//! utterance kills the previous one. Text reaches the synthesizer on stdin,
//! never on the command line, so spoken text cannot be parsed as options. The recognizer runs one program per
//! capture session and reads the transcript from its stdout.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;

use crate::capability::{SpeechRecognizer, SpeechSynthesizer};
use crate::error::SpeechError;

/// Environment variable carrying the language tag to the child process.
pub const LANGUAGE_ENV: &str = "AROVEDA_SPEECH_LANG";

/// Split a configured command line into program and leading arguments.
fn split_command(command: &[String]) -> Option<(String, Vec<String>)> {
    let (program, args) = command.split_first()?;
    if program.trim().is_empty() {
        return None;
    }
    Some((program.clone(), args.to_vec()))
}

// =============================================================================
// Synthesis
// =============================================================================

/// Text-to-speech through a program such as `espeak-ng --stdin` or `say -f -`.
///
/// The program must read the text to speak from stdin; the pipe is closed
/// once the whole text has been written.
#[derive(Debug)]
pub struct CommandSynthesizer {
    program: String,
    args: Vec<String>,
    current: Mutex<Option<Child>>,
}

impl CommandSynthesizer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            current: Mutex::new(None),
        }
    }

    /// Build from a configured command line. Returns `None` when the command is empty.
    pub fn from_command(command: &[String]) -> Option<Self> {
        split_command(command).map(|(program, args)| Self::new(program, args))
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Whether an utterance is still playing.
    pub async fn is_speaking(&self) -> bool {
        let mut current = self.current.lock().await;
        match current.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }

    async fn stop_current(slot: &mut Option<Child>) {
        if let Some(mut child) = slot.take() {
            match child.try_wait() {
                Ok(Some(_)) => {}
                _ => {
                    if let Err(e) = child.kill().await {
                        tracing::debug!(error = %e, "Utterance already gone");
                    } else {
                        tracing::debug!("Utterance cancelled");
                    }
                }
            }
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for CommandSynthesizer {
    async fn speak(&self, text: &str, language: &str) -> Result<(), SpeechError> {
        let mut current = self.current.lock().await;
        Self::stop_current(&mut current).await;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env(LANGUAGE_ENV, language)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SpeechError::Backend(format!("{}: {}", self.program, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            let text = text.to_string();
            let program = self.program.clone();
            tokio::spawn(async move {
                if let Err(e) = stdin.write_all(text.as_bytes()).await {
                    tracing::debug!(program = %program, error = %e, "Synthesizer stopped reading text");
                }
                // Dropping `stdin` closes the pipe.
            });
        }

        tracing::debug!(program = %self.program, text_len = text.len(), "Utterance started");
        *current = Some(child);
        Ok(())
    }

    async fn cancel(&self) -> Result<(), SpeechError> {
        let mut current = self.current.lock().await;
        Self::stop_current(&mut current).await;
        Ok(())
    }
}

// =============================================================================
// Recognition
// =============================================================================

/// Speech-to-text through a program that records one utterance and prints
/// its transcript alternatives to stdout, best first, one per line.
///
/// The language tag is passed as the final argument.
#[derive(Debug, Clone)]
pub struct CommandRecognizer {
    program: String,
    args: Vec<String>,
    max_capture: Duration,
}

impl CommandRecognizer {
    pub fn new(program: impl Into<String>, args: Vec<String>, max_capture: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            max_capture,
        }
    }

    /// Build from a configured command line. Returns `None` when the command is empty.
    pub fn from_command(command: &[String], max_capture: Duration) -> Option<Self> {
        split_command(command).map(|(program, args)| Self::new(program, args, max_capture))
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

#[async_trait]
impl SpeechRecognizer for CommandRecognizer {
    async fn recognize(&self, language: &str) -> Result<Vec<String>, SpeechError> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(language)
            .env(LANGUAGE_ENV, language)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        tracing::debug!(program = %self.program, "Capture session opened");
        let output = tokio::time::timeout(self.max_capture, command.output())
            .await
            .map_err(|_| SpeechError::Timeout(self.max_capture.as_secs()))?
            .map_err(|e| SpeechError::Backend(format!("{}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SpeechError::Backend(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let alternatives = String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Ok(alternatives)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<String> {
        vec![
            "sh".to_string(),
            "-c".to_string(),
            script.to_string(),
            "sh".to_string(),
        ]
    }

    #[test]
    fn test_from_empty_command_is_none() {
        assert!(CommandSynthesizer::from_command(&[]).is_none());
        assert!(CommandSynthesizer::from_command(&["  ".to_string()]).is_none());
        assert!(CommandRecognizer::from_command(&[], Duration::from_secs(1)).is_none());
    }

    #[test]
    fn test_from_command_splits_program_and_args() {
        let synth = CommandSynthesizer::from_command(&[
            "espeak-ng".to_string(),
            "-v".to_string(),
            "en-us".to_string(),
        ])
        .unwrap();
        assert_eq!(synth.program(), "espeak-ng");
        assert_eq!(synth.args, vec!["-v", "en-us"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_recognizer_reads_alternatives_from_stdout() {
        let recognizer = CommandRecognizer::from_command(
            &sh("printf 'first guess\\n\\n  second guess \\n'"),
            Duration::from_secs(5),
        )
        .unwrap();

        let alternatives = recognizer.recognize("en-US").await.unwrap();
        assert_eq!(alternatives, vec!["first guess", "second guess"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_recognizer_receives_language_tag() {
        let recognizer =
            CommandRecognizer::from_command(&sh("echo \"$1\""), Duration::from_secs(5)).unwrap();

        let alternatives = recognizer.recognize("en-US").await.unwrap();
        assert_eq!(alternatives, vec!["en-US"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_recognizer_failure_is_backend_error() {
        let recognizer = CommandRecognizer::from_command(
            &sh("echo 'mic busy' >&2; exit 3"),
            Duration::from_secs(5),
        )
        .unwrap();

        let err = recognizer.recognize("en-US").await.unwrap_err();
        match err {
            SpeechError::Backend(msg) => assert!(msg.contains("mic busy")),
            other => panic!("Expected Backend error, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_recognizer_times_out() {
        let recognizer =
            CommandRecognizer::from_command(&sh("sleep 5"), Duration::from_millis(100)).unwrap();

        let err = recognizer.recognize("en-US").await.unwrap_err();
        assert!(matches!(err, SpeechError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_recognizer_missing_program() {
        let recognizer = CommandRecognizer::new(
            "/definitely/not/a/recognizer",
            Vec::new(),
            Duration::from_secs(1),
        );
        let err = recognizer.recognize("en-US").await.unwrap_err();
        assert!(matches!(err, SpeechError::Backend(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_synthesizer_new_utterance_replaces_old() {
        // `sleep 30` stands in for a long utterance.
        let synth = CommandSynthesizer::new("sleep", vec!["30".to_string()]);

        synth.speak("first", "en-US").await.unwrap();
        assert!(synth.is_speaking().await);

        synth.speak("second", "en-US").await.unwrap();
        assert!(synth.is_speaking().await);

        synth.cancel().await.unwrap();
        assert!(!synth.is_speaking().await);
    }

    async fn wait_until_quiet(synth: &CommandSynthesizer) {
        for _ in 0..250 {
            if !synth.is_speaking().await {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("utterance did not finish");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_synthesizer_reads_text_from_stdin() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("spoken.txt");
        let synth = CommandSynthesizer::new(
            "sh",
            vec!["-c".to_string(), format!("cat > '{}'", out.display())],
        );

        synth.speak("The answer is 42.", "en-US").await.unwrap();
        wait_until_quiet(&synth).await;

        assert_eq!(std::fs::read_to_string(&out).unwrap(), "The answer is 42.");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_synthesizer_leading_dash_text_is_not_an_option() {
        let dir = tempfile::tempdir().unwrap();
        let victim = dir.path().join("notes.txt");
        std::fs::write(&victim, "precious user data\n").unwrap();

        // `sort -o<file>` truncates <file> if the text ever reaches argv.
        let synth = CommandSynthesizer::new("sort", Vec::new());
        synth
            .speak(&format!("-o{}", victim.display()), "en-US")
            .await
            .unwrap();
        wait_until_quiet(&synth).await;

        assert_eq!(
            std::fs::read_to_string(&victim).unwrap(),
            "precious user data\n"
        );
    }

    #[tokio::test]
    async fn test_synthesizer_cancel_without_utterance() {
        let synth = CommandSynthesizer::new("sleep", Vec::new());
        synth.cancel().await.unwrap();
        assert!(!synth.is_speaking().await);
    }

    #[tokio::test]
    async fn test_synthesizer_missing_program() {
        let synth = CommandSynthesizer::new("/definitely/not/a/synthesizer", Vec::new());
        let err = synth.speak("hello", "en-US").await.unwrap_err();
        assert!(matches!(err, SpeechError::Backend(_)));
    }
}
