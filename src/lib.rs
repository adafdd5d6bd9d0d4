//! Workspace tooling package. It exists to install the rusty-hook pre-commit
//! checks declared in the root `Cargo.toml`; the code lives under `crates/`.
