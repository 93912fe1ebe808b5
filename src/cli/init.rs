//! Init command implementation
//!
//! Scaffolds a cookbook project: configuration, env template, data
//! directory and gitignore.

use super::output::Output;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of the init operation
pub enum InitResult {
    /// Initialization completed successfully
    Success,
    /// Project already exists (cookbook.toml found)
    AlreadyExists,
    /// An error occurred during initialization
    Error(String),
}

/// Configuration for the init command
pub struct InitConfig {
    /// Directory to initialize
    pub path: PathBuf,
    /// Overwrite existing files
    pub force: bool,
}

/// A file written by `init`.
struct ScaffoldFile {
    name: &'static str,
    kind: &'static str,
    contents: fn() -> String,
    /// Left alone if present, even with `--force`.
    preserve: bool,
}

const SCAFFOLD: &[ScaffoldFile] = &[
    ScaffoldFile {
        name: "cookbook.toml",
        kind: "config",
        contents: generate_cookbook_toml,
        preserve: false,
    },
    ScaffoldFile {
        name: ".env.example",
        kind: "env",
        contents: generate_env_example,
        preserve: false,
    },
    ScaffoldFile {
        name: ".gitignore",
        kind: "file",
        contents: generate_gitignore,
        preserve: true,
    },
];

/// Run the init command
pub fn run(config: InitConfig, output: &Output) -> InitResult {
    output.banner();
    output.header("Initializing Cookbook Project");

    let base = &config.path;
    if base.join("cookbook.toml").exists() && !config.force {
        output.warning("cookbook.toml already exists!");
        output.hint("Use --force to overwrite existing files");
        return InitResult::AlreadyExists;
    }

    output.subheader("Creating directories");
    let data_dir = base.join("data");
    if data_dir.exists() {
        output.skipped("data", "already exists");
    } else if let Err(e) = fs::create_dir_all(&data_dir) {
        output.error(&format!("Failed to create data: {}", e));
        return InitResult::Error(e.to_string());
    } else {
        output.created_dir("data");
    }

    output.subheader("Creating configuration files");
    for file in SCAFFOLD {
        let path = base.join(file.name);
        if file.preserve && path.exists() {
            output.skipped(file.name, "already exists");
            continue;
        }

        match write_file(&path, &(file.contents)(), config.force) {
            Ok(()) => output.created(file.kind, file.name),
            Err(e) if file.preserve => {
                output.warning(&format!("Failed to create {}: {}", file.name, e));
            }
            Err(e) => {
                output.error(&format!("Failed to create {}: {}", file.name, e));
                return InitResult::Error(e.to_string());
            }
        }
    }

    output.complete("Cookbook project initialized successfully!");
    print_next_steps(output);

    InitResult::Success
}

fn print_next_steps(output: &Output) {
    output.header("Next Steps");
    output.newline();
    output.info("1. Set up environment variables:");
    output.command("cp .env.example .env");
    output.command("# Edit .env and set JWT_SECRET and ADMIN_PASSWORD");
    output.newline();
    output.info("2. Start the server:");
    output.command("cookbook-server");
    output.newline();

    output.hint("Health check: http://127.0.0.1:3000/api/v1/health");
    output.hint("API docs at /swagger-ui/ when built with the 'swagger-ui' feature");
}

/// Writes `content` unless `path` exists and `force` is off.
fn write_file(path: &Path, content: &str, force: bool) -> std::io::Result<()> {
    if path.exists() && !force {
        return Ok(());
    }
    fs::write(path, content)
}

fn generate_cookbook_toml() -> String {
    r#"# Cookbook server configuration
# Secrets are read from the environment variables named here, never from this file.

[server]
host = "127.0.0.1"
port = 3000
log_level = "info"     # overridden by RUST_LOG
log_format = "fmt"     # "fmt" or "json"

[auth]
jwt_secret_env = "JWT_SECRET"
token_expiry_hours = 24
cookie_name = "jwt"

[database]
url = "./data/cookbook.db"   # ":memory:" for an ephemeral store
# turso_url_env = "TURSO_URL"
# turso_token_env = "TURSO_AUTH_TOKEN"

[admin]
username = "admin"
password_env = "ADMIN_PASSWORD"
"#
    .to_string()
}

fn generate_env_example() -> String {
    r#"# Cookbook Environment Variables
# ==============================
# Copy this file to .env and fill in the values.

# REQUIRED: JWT signing secret
# Generate with: openssl rand -base64 32
JWT_SECRET=change-me-in-production-use-at-least-32-characters

# Password for the bootstrap admin account (falls back to "admin" when unset)
ADMIN_PASSWORD=change-me

# Optional: Logging level (trace, debug, info, warn, error)
RUST_LOG=info,cookbook=debug

# Optional: Turso cloud database (requires the `turso` feature)
# TURSO_URL=libsql://your-db.turso.io
# TURSO_AUTH_TOKEN=your-token
"#
    .to_string()
}

fn generate_gitignore() -> String {
    r#"# Cookbook Generated Files
/data/
*.db
*.db-journal
*.db-wal
*.db-shm

# Environment
.env
.env.local

# Rust
/target/

# OS
.DS_Store
"#
    .to_string()
}
