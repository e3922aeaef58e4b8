//! Toolchain detection and external tool operations
//!
//! This module provides:
//! - Tool detection (git, Yarn, pnpm)
//! - Package manager selection and dependency installation
//! - Repository initialization and commits

pub mod check;
pub mod git;
pub mod package_manager;

pub use check::{check_git, check_pnpm, check_yarn, ToolInfo, Toolchain};
pub use package_manager::{CommandInstaller, Installer, PackageManager};
