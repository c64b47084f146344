//! Environment diagnostics for bug reports (`create-webiny-project info`).

use std::fmt;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// Candidate commands used to probe one tool, tried in order.
struct Probe {
    label: &'static str,
    commands: &'static [&'static [&'static str]],
}

const BINARIES: &[Probe] = &[
    Probe {
        label: "Node",
        commands: &[&["node", "--version"]],
    },
    Probe {
        label: "npm",
        commands: &[&["npm", "--version"]],
    },
    Probe {
        label: "Yarn",
        commands: &[&["yarnpkg", "--version"], &["yarn", "--version"]],
    },
];

const BROWSERS: &[Probe] = &[
    Probe {
        label: "Chrome",
        commands: &[
            &["google-chrome", "--version"],
            &["google-chrome-stable", "--version"],
            &["chromium", "--version"],
        ],
    },
    Probe {
        label: "Edge",
        commands: &[&["microsoft-edge", "--version"], &["microsoft-edge-stable", "--version"]],
    },
    Probe {
        label: "Firefox",
        commands: &[&["firefox", "--version"]],
    },
    Probe {
        label: "Safari",
        commands: &[&[
            "defaults",
            "read",
            "/Applications/Safari.app/Contents/Info",
            "CFBundleShortVersionString",
        ]],
    },
];

/// Version of one external tool, `None` if it was not found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolVersion {
    pub name: String,
    pub version: Option<String>,
}

/// Snapshot of the environment the CLI runs in.
#[derive(Debug, Clone, Serialize)]
pub struct EnvironmentInfo {
    pub package_name: String,
    pub package_version: String,
    pub running_from: Option<PathBuf>,
    pub os: String,
    pub cpu: String,
    pub binaries: Vec<ToolVersion>,
    pub browsers: Vec<ToolVersion>,
}

/// Collect OS, CPU, runtime tool and browser versions.
pub fn collect_environment_info(package_name: &str, package_version: &str) -> EnvironmentInfo {
    let cpus = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);

    EnvironmentInfo {
        package_name: package_name.to_string(),
        package_version: package_version.to_string(),
        running_from: std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(PathBuf::from)),
        os: os_description(),
        cpu: match cpu_model() {
            Some(model) => format!("({}) {} {}", cpus, std::env::consts::ARCH, model),
            None => format!("({}) {}", cpus, std::env::consts::ARCH),
        },
        binaries: BINARIES.iter().map(probe).collect(),
        browsers: BROWSERS.iter().map(probe).collect(),
    }
}

/// Collect and print the environment report.
pub fn print_environment_info(package_name: &str, package_version: &str) {
    print!("{}", collect_environment_info(package_name, package_version));
}

impl fmt::Display for EnvironmentInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "Environment Info:")?;
        writeln!(f)?;
        writeln!(
            f,
            "  current version of {}: {}",
            self.package_name, self.package_version
        )?;
        if let Some(dir) = &self.running_from {
            writeln!(f, "  running from {}", dir.display())?;
        }
        writeln!(f)?;
        writeln!(f, "  System:")?;
        writeln!(f, "    OS: {}", self.os)?;
        writeln!(f, "    CPU: {}", self.cpu)?;
        write_section(f, "Binaries", &self.binaries)?;
        write_section(f, "Browsers", &self.browsers)
    }
}

fn write_section(f: &mut fmt::Formatter<'_>, title: &str, tools: &[ToolVersion]) -> fmt::Result {
    writeln!(f, "  {}:", title)?;
    for tool in tools {
        writeln!(
            f,
            "    {}: {}",
            tool.name,
            tool.version.as_deref().unwrap_or("Not Found")
        )?;
    }
    Ok(())
}

fn probe(probe: &Probe) -> ToolVersion {
    let version = probe
        .commands
        .iter()
        .find_map(|command| run_version_command(command));

    ToolVersion {
        name: probe.label.to_string(),
        version,
    }
}

fn run_version_command(command: &[&str]) -> Option<String> {
    let (program, args) = command.split_first()?;
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }
    extract_version(&String::from_utf8_lossy(&output.stdout))
}

/// First dotted version number in a tool's output, e.g. `v18.17.1` gives
/// `18.17.1`.
fn extract_version(output: &str) -> Option<String> {
    static VERSION: OnceLock<Regex> = OnceLock::new();
    let pattern = VERSION.get_or_init(|| Regex::new(r"\d+(?:\.\d+)+").unwrap());
    pattern.find(output).map(|m| m.as_str().to_string())
}

/// CPU model name from `/proc/cpuinfo`, or from `sysctl` on macOS.
fn cpu_model() -> Option<String> {
    if let Ok(cpuinfo) = std::fs::read_to_string("/proc/cpuinfo") {
        return parse_cpu_model(&cpuinfo);
    }

    Command::new("sysctl")
        .args(["-n", "machdep.cpu.brand_string"])
        .stderr(Stdio::null())
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parse_cpu_model(cpuinfo: &str) -> Option<String> {
    cpuinfo
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(key, _)| matches!(key.trim(), "model name" | "Model" | "cpu model"))
        .map(|(_, value)| value.trim().to_string())
        .filter(|model| !model.is_empty())
}

fn os_description() -> String {
    let uname = Command::new("uname")
        .arg("-sr")
        .stderr(Stdio::null())
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
        .filter(|s| !s.is_empty());

    uname.unwrap_or_else(|| std::env::consts::OS.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_version() {
        assert_eq!(extract_version("v18.17.1\n").as_deref(), Some("18.17.1"));
        assert_eq!(
            extract_version("Google Chrome 120.0.6099.109 ").as_deref(),
            Some("120.0.6099.109")
        );
        assert_eq!(extract_version("1.22.19").as_deref(), Some("1.22.19"));
        assert_eq!(extract_version("no version here"), None);
    }

    #[test]
    fn test_parse_cpu_model() {
        let cpuinfo = "processor\t: 0\nvendor_id\t: GenuineIntel\n\
                       model\t\t: 158\nmodel name\t: Intel(R) Core(TM) i7-8700 CPU @ 3.20GHz\n";
        assert_eq!(
            parse_cpu_model(cpuinfo).as_deref(),
            Some("Intel(R) Core(TM) i7-8700 CPU @ 3.20GHz")
        );
        assert_eq!(parse_cpu_model("processor\t: 0\n"), None);
    }

    #[test]
    fn test_report_lists_missing_tools() {
        let info = EnvironmentInfo {
            package_name: "create-webiny-project".to_string(),
            package_version: "0.1.0".to_string(),
            running_from: None,
            os: "Linux 6.1".to_string(),
            cpu: "(8) x86_64".to_string(),
            binaries: vec![ToolVersion {
                name: "Node".to_string(),
                version: Some("18.17.1".to_string()),
            }],
            browsers: vec![ToolVersion {
                name: "Firefox".to_string(),
                version: None,
            }],
        };

        let report = info.to_string();
        assert!(report.contains("current version of create-webiny-project: 0.1.0"));
        assert!(report.contains("    OS: Linux 6.1"));
        assert!(report.contains("    Node: 18.17.1"));
        assert!(report.contains("    Firefox: Not Found"));
    }

    #[test]
    fn test_collect_environment_info() {
        let info = collect_environment_info("create-webiny-project", "0.1.0");
        assert_eq!(info.binaries.len(), BINARIES.len());
        assert_eq!(info.browsers.len(), BROWSERS.len());
        assert!(!info.os.is_empty());
    }
}
