//! # xtask - 开发辅助工具
//!
//! 提供本地质量门禁与开发辅助命令。
//!
//! ## 命令
//!
//! - `check-all`: 运行 fmt、clippy、test
//! - `cov-runtime`: 运行 folio-runtime 覆盖率
//! - `build-web`: 构建 wasm 宿主
//! - `test-web`: 在无头浏览器里运行 folio-web 的 DOM 测试
//! - `config-check`: 检查动效配置文件
//! - `config-dump`: 输出默认配置

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use folio_runtime::MotionConfig;
use xshell::{Shell, cmd};

const WASM_TARGET: &str = "wasm32-unknown-unknown";

#[derive(Parser)]
#[command(name = "xtask", about = "开发辅助工具")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 运行 fmt、clippy、test 门禁检查
    CheckAll,
    /// 运行 folio-runtime 覆盖率报告
    CovRuntime,
    /// 以 release 配置构建 folio-web
    BuildWeb,
    /// 在无头浏览器里运行 folio-web 测试
    TestWeb,
    /// 检查配置文件（单个 .json 或目录）
    ConfigCheck {
        #[arg(default_value = "config")]
        path: PathBuf,
    },
    /// 输出默认配置（JSON）
    ConfigDump,
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("xtask error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let sh = Shell::new()?;

    match cli.command {
        Command::CheckAll => {
            step("cargo fmt --all -- --check");
            cmd!(sh, "cargo fmt --all -- --check").run()?;

            step("cargo clippy --workspace --all-targets");
            cmd!(sh, "cargo clippy --workspace --all-targets").run()?;

            // folio-web 的浏览器测试需要 wasm-bindgen-test-runner，本机只跑纯函数部分
            step("cargo test -p folio-runtime -p folio-web -p xtask");
            cmd!(sh, "cargo test -p folio-runtime -p folio-web -p xtask").run()?;
        }
        Command::CovRuntime => {
            ensure_cargo_llvm_cov_available(&sh)?;

            step("cargo llvm-cov -p folio-runtime --html");
            cmd!(sh, "cargo llvm-cov -p folio-runtime --html").run()?;

            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        Command::BuildWeb => {
            step("cargo build -p folio-web --release");
            cmd!(sh, "cargo build -p folio-web --release --target {WASM_TARGET}").run()?;

            eprintln!("\nwasm: target/{WASM_TARGET}/release/folio_web.wasm");
        }
        Command::TestWeb => {
            ensure_wasm_test_runner_available(&sh)?;

            step("cargo test -p folio-web --target wasm32-unknown-unknown");
            cmd!(sh, "cargo test -p folio-web --target {WASM_TARGET}").run()?;
        }
        Command::ConfigCheck { path } => config_check(&path)?,
        Command::ConfigDump => {
            println!("{}", MotionConfig::default().to_json_pretty()?);
        }
    }

    Ok(())
}

fn step(name: &str) {
    eprintln!("\n==> {name}");
}

fn ensure_cargo_llvm_cov_available(sh: &Shell) -> anyhow::Result<()> {
    if cmd!(sh, "cargo llvm-cov --version").quiet().run().is_ok() {
        return Ok(());
    }
    anyhow::bail!(
        "cargo llvm-cov 不可用。\n\
请先安装：\n\
  - cargo install cargo-llvm-cov\n\
  - rustup component add llvm-tools-preview\n\
然后重试。"
    )
}

fn ensure_wasm_test_runner_available(sh: &Shell) -> anyhow::Result<()> {
    if cmd!(sh, "wasm-bindgen-test-runner --version").quiet().run().is_ok() {
        return Ok(());
    }
    anyhow::bail!(
        "wasm-bindgen-test-runner 不可用。\n\
请先安装：\n\
  - cargo install wasm-bindgen-cli\n\
  - rustup target add {WASM_TARGET}\n\
然后重试。"
    )
}

//=============================================================================
// config-check 命令实现
//=============================================================================

/// 检查一个文件或目录下的全部 `.json` 配置
fn config_check(path: &Path) -> anyhow::Result<()> {
    let files = if path.is_file() {
        vec![path.to_path_buf()]
    } else if path.is_dir() {
        collect_config_files(path)?
    } else {
        anyhow::bail!("路径不存在: {}", path.display());
    };

    if files.is_empty() {
        eprintln!("未找到配置文件（.json）");
        return Ok(());
    }

    eprintln!("==> 检查 {} 个配置文件...\n", files.len());

    let mut errors = 0;
    for file in &files {
        if let Err(e) = check_config_file(file) {
            eprintln!("[ERROR] {}: {e:#}", file.display());
            errors += 1;
        }
    }

    eprintln!("─────────────────────────────────────────────────────");
    if errors > 0 {
        anyhow::bail!("{errors} 个配置文件有错误");
    }
    eprintln!("✅ 检查通过，无错误");
    Ok(())
}

fn check_config_file(file: &Path) -> anyhow::Result<MotionConfig> {
    let content = std::fs::read_to_string(file)?;
    Ok(MotionConfig::from_json(&content)?)
}

fn collect_config_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_config_files_recursive(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_config_files_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> anyhow::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_config_files_recursive(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    Ok(())
}
