//! Release helper: build, sign and optionally upload a package of this
//! crate.
//!
//! Replaces the old release shell script, so the option parsing keeps its
//! exit-code contract: `-h` prints usage and exits 1; an unknown option or a
//! missing option argument exits 2. Interactive confirmations gate the build
//! and the upload.

use sha2::{Digest, Sha256};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

const PACKAGE: &str = "dractl";

fn usage() {
    eprintln!("usage: dractl-release [-h] [-u] [-r <repository-url>]");
    eprintln!("  -h   show this help");
    eprintln!("  -u   upload the package after building and signing");
    eprintln!("  -r   upload to a custom repository (registry index URL)");
}

struct Options {
    upload: bool,
    repository: Option<String>,
}

enum ParseResult {
    Run(Options),
    Exit(i32),
}

fn parse_args(args: impl Iterator<Item = String>) -> ParseResult {
    let mut options = Options {
        upload: false,
        repository: None,
    };
    let mut args = args;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" => {
                usage();
                return ParseResult::Exit(1);
            }
            "-u" => options.upload = true,
            "-r" => match args.next() {
                Some(url) => options.repository = Some(url),
                None => {
                    eprintln!("option -r requires an argument");
                    usage();
                    return ParseResult::Exit(2);
                }
            },
            other => {
                eprintln!("unknown option: {other}");
                usage();
                return ParseResult::Exit(2);
            }
        }
    }
    ParseResult::Run(options)
}

fn main() {
    let code = match parse_args(std::env::args().skip(1)) {
        ParseResult::Exit(code) => code,
        ParseResult::Run(options) => match run(&options) {
            Ok(()) => 0,
            Err(err) => {
                eprintln!("error: {err:#}");
                1
            }
        },
    };
    std::process::exit(code);
}

fn read_version() -> anyhow::Result<String> {
    let raw = std::fs::read_to_string("VERSION")
        .map_err(|e| anyhow::anyhow!("reading VERSION file: {e}"))?;
    let version = raw.trim().to_string();
    anyhow::ensure!(!version.is_empty(), "VERSION file is empty");
    Ok(version)
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn run_tool(description: &str, cmd: &mut Command) -> anyhow::Result<()> {
    let status = cmd
        .status()
        .map_err(|e| anyhow::anyhow!("running {description}: {e}"))?;
    anyhow::ensure!(status.success(), "{description} failed with {status}");
    Ok(())
}

fn write_checksum(archive: &Path) -> anyhow::Result<PathBuf> {
    let data = std::fs::read(archive)?;
    let digest = hex::encode(Sha256::digest(&data));
    let name = archive
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let path = archive.with_extension("crate.sha256");
    std::fs::write(&path, format!("{digest}  {name}\n"))?;
    Ok(path)
}

fn run(options: &Options) -> anyhow::Result<()> {
    let version = read_version()?;

    if !confirm(&format!("build {PACKAGE} {version}?"))? {
        println!("build skipped");
        return Ok(());
    }

    run_tool("cargo package", Command::new("cargo").args(["package"]))?;

    let archive = PathBuf::from(format!("target/package/{PACKAGE}-{version}.crate"));
    anyhow::ensure!(
        archive.exists(),
        "expected package archive at {}",
        archive.display()
    );

    let checksum = write_checksum(&archive)?;
    println!("checksum written: {}", checksum.display());

    run_tool(
        "gpg",
        Command::new("gpg").args(["--detach-sign", "--armor", "--yes"]).arg(&archive),
    )?;
    println!("signature written: {}.asc", archive.display());

    if options.upload {
        if !confirm(&format!("upload {PACKAGE} {version}?"))? {
            println!("upload skipped");
            return Ok(());
        }
        let mut publish = Command::new("cargo");
        publish.arg("publish");
        if let Some(repository) = &options.repository {
            publish.args(["--index", repository]);
        }
        run_tool("cargo publish", &mut publish)?;
        println!("uploaded {PACKAGE} {version}");
    }

    Ok(())
}
