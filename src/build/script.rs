//! Build through the project's own `build.sh`.

use std::fs;
use std::path::Path;

use log::{info, warn};

use super::{BuildArtifact, BuildRequest, Builder, DirectBuilder};
use crate::command::{CommandRunner, ExternalCommand};
use crate::defaults::BUILD_SCRIPT;
use crate::error::Result;
use crate::settings::Launcher;

/// Converts CRLF line endings to LF in place and marks the file executable.
///
/// The script runs under a POSIX shell, which chokes on stray carriage
/// returns.
pub fn fix_line_endings(path: &Path) -> Result<()> {
    info!("Fixing line endings for {}", path.display());
    let content = fs::read(path)?;

    let mut converted = Vec::with_capacity(content.len());
    let mut bytes = content.iter().peekable();
    while let Some(&b) = bytes.next() {
        if b == b'\r' && bytes.peek() == Some(&&b'\n') {
            continue;
        }
        converted.push(b);
    }
    fs::write(path, converted)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    }

    info!("Fixed line endings and made executable: {}", path.display());
    Ok(())
}

/// The command line that runs the build script with `launcher`.
pub fn launcher_command(launcher: &Launcher, request: &BuildRequest<'_>) -> ExternalCommand {
    let cmd = match launcher {
        Launcher::Exec => ExternalCommand::new(format!("./{}", BUILD_SCRIPT)),
        Launcher::Interpreter(words) => {
            let (program, prefix) = match words.split_first() {
                Some((program, prefix)) => (program.as_str(), prefix),
                None => ("sh", &[][..]),
            };
            ExternalCommand::new(program)
                .args(prefix.iter().cloned())
                .arg(BUILD_SCRIPT)
        }
    };
    cmd.args([request.image_tag, request.version, request.mode.as_str()])
}

/// Runs `build.sh <image_tag> <version> <mode>` through each launcher in
/// turn until one succeeds.
pub struct ScriptBuilder<'a> {
    runner: &'a dyn CommandRunner,
    launchers: Vec<Launcher>,
    fallback: Option<DirectBuilder<'a>>,
}

impl<'a> ScriptBuilder<'a> {
    pub fn new(runner: &'a dyn CommandRunner, launchers: Vec<Launcher>) -> Self {
        Self {
            runner,
            launchers,
            fallback: None,
        }
    }

    /// Falls back to `direct` when every launcher fails.
    pub fn with_fallback(mut self, direct: DirectBuilder<'a>) -> Self {
        self.fallback = Some(direct);
        self
    }
}

impl Builder for ScriptBuilder<'_> {
    fn name(&self) -> &'static str {
        if self.fallback.is_some() {
            "script+direct"
        } else {
            "script"
        }
    }

    fn build(&self, request: &BuildRequest<'_>) -> Result<BuildArtifact> {
        let script = Path::new(BUILD_SCRIPT);
        if !script.exists() {
            let cwd = std::env::current_dir().unwrap_or_default();
            return Err(request.failure(format!(
                "{} not found in {}",
                BUILD_SCRIPT,
                cwd.display()
            )));
        }

        fix_line_endings(script).map_err(|e| {
            request.failure(format!("Failed to fix line endings for {}: {}", BUILD_SCRIPT, e))
        })?;

        info!(
            "Running build script with parameters: {} {} {}",
            request.image_tag, request.version, request.mode
        );

        let mut last_failure = String::from("no launcher configured");
        for launcher in &self.launchers {
            let cmd = launcher_command(launcher, request);
            match self.runner.run(&cmd) {
                Ok(out) if out.success => {
                    info!("Build output: {}", out.output);
                    info!("Successfully built {}:{}", request.image_tag, request.version);
                    return Ok(BuildArtifact {
                        image: None,
                        output: out.output,
                    });
                }
                Ok(out) => {
                    warn!("Launcher '{}' failed: {}", launcher, out.output);
                    last_failure = out.output;
                }
                Err(e) => {
                    warn!("Launcher '{}' failed: {}", launcher, e);
                    last_failure = e.to_string();
                }
            }
        }

        if let Some(direct) = &self.fallback {
            info!("Build script launchers failed, trying direct build process...");
            return direct.build(request);
        }

        Err(request.failure(format!("Build script failed: {}", last_failure)))
    }
}
