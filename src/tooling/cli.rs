//! CLI Tooling
//!
//! Command-line interface over one VFS. Each invocation opens the configured
//! store, runs a single command and returns its rendered output.

use crate::concurrency::VfsHandle;
use crate::config::{StorageBackend, VfsConfig};
use crate::error::{ApiError, VfsError};
use crate::notify::{Notification, NotificationLevel, Notifier};
use crate::service::VfsService;
use crate::store::TreeOrigin;
use crate::tree::{FolderNode, Node, NodeRef, VfsPath};
use clap::{Parser, Subcommand};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::json;
use std::path::PathBuf;

/// simvfs CLI - simulated file system on a key/value store
#[derive(Parser)]
#[command(name = "simvfs")]
#[command(about = "Simulated virtual file system persisted to a key/value store")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (layered over the global config)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// sled store directory (overrides storage.path)
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Use a throwaway in-memory store
    #[arg(long, conflicts_with = "store")]
    pub memory: bool,

    /// Content codec seed (overrides codec.seed)
    #[arg(long)]
    pub seed: Option<String>,

    /// Suppress operation notifications
    #[arg(long, short)]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Fold command-line flags into a loaded configuration.
    pub fn apply_overrides(&self, config: &mut VfsConfig) {
        if let Some(store) = &self.store {
            config.storage.backend = StorageBackend::Sled;
            config.storage.path = Some(store.clone());
        }
        if self.memory {
            config.storage.backend = StorageBackend::Memory;
        }
        if let Some(seed) = &self.seed {
            config.codec.seed = Some(seed.clone());
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.logging.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            config.logging.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            config.logging.file = Some(file.clone());
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the children of a folder
    Ls {
        #[arg(default_value = "/")]
        path: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print a file's content
    Cat { path: String },
    /// Show a node's metadata
    Stat {
        path: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Create an empty file
    Touch { path: String },
    /// Replace a file's content, creating the file if needed
    Write { path: String, content: String },
    /// Create a folder
    Mkdir { path: String },
    /// Delete a file or folder and everything under it
    Rm { path: String },
    /// Rename a file or folder in place
    Mv { path: String, new_name: String },
    /// Print the subtree under a path
    Tree {
        #[arg(default_value = "/")]
        path: String,
    },
    /// Show the display summary of a file's encoded content
    Decode {
        path: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Check tree invariants
    Validate {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show store, codec and tree summary
    Status {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

/// Prints notifications to stderr, colored by outcome
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => {
                eprintln!("{} {}", "ok".green().bold(), notification.message)
            }
            NotificationLevel::Error => {
                eprintln!("{} {}", "error".red().bold(), notification.message)
            }
        }
    }
}

/// CLI context for executing commands
pub struct CliContext {
    vfs: VfsHandle,
    backend: StorageBackend,
    store_path: Option<PathBuf>,
}

impl CliContext {
    /// Open the store described by `config` and load the tree.
    pub fn new(config: &VfsConfig, notifier: impl Notifier + 'static) -> Result<Self, ApiError> {
        let gateway = config.storage.open_gateway()?;
        let mut builder = VfsService::builder(gateway)
            .preview_chars(config.codec.preview_chars)
            .notifier(notifier);
        if let Some(seed) = &config.codec.seed {
            builder = builder.seed(seed.clone());
        }
        let service = builder.open()?;

        let store_path = match config.storage.backend {
            StorageBackend::Sled => Some(config.storage.resolve_path()?),
            StorageBackend::Memory => None,
        };
        Ok(Self {
            vfs: VfsHandle::new(service),
            backend: config.storage.backend,
            store_path,
        })
    }

    pub fn handle(&self) -> &VfsHandle {
        &self.vfs
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Ls { path, format } => self.handle_ls(path, format),
            Commands::Cat { path } => Ok(self.vfs.read_file(path)?),
            Commands::Stat { path, format } => self.handle_stat(path, format),
            Commands::Touch { path } => {
                let (parent, name) = split_target(path)?;
                let created = self.vfs.create_file(&parent, &name, "")?;
                Ok(format!("Created {}", created))
            }
            Commands::Write { path, content } => self.handle_write(path, content),
            Commands::Mkdir { path } => {
                let (parent, name) = split_target(path)?;
                let created = self.vfs.create_folder(&parent, &name)?;
                Ok(format!("Created {}/", created))
            }
            Commands::Rm { path } => {
                let deleted = self.vfs.delete_item(path)?;
                Ok(format!("Deleted {}", deleted))
            }
            Commands::Mv { path, new_name } => {
                let renamed = self.vfs.rename_item(path, new_name)?;
                Ok(format!("Renamed {} to {}", VfsPath::parse(path), renamed))
            }
            Commands::Tree { path } => self.handle_tree(path),
            Commands::Decode { path, format } => self.handle_decode(path, format),
            Commands::Validate { format } => self.handle_validate(format),
            Commands::Status { format } => self.handle_status(format),
        }
    }

    fn handle_ls(&self, path: &str, format: &str) -> Result<String, ApiError> {
        let format = OutputFormat::parse(format)?;
        self.vfs.with(|svc| -> Result<String, ApiError> {
            let folder = match svc.get_item(path) {
                Some(NodeRef::Folder(folder)) => folder,
                Some(NodeRef::File(_)) => {
                    return Err(VfsError::NotAFolder(VfsPath::parse(path).to_string()).into())
                }
                None => return Err(VfsError::NotFound(VfsPath::parse(path).to_string()).into()),
            };
            let children = svc.list_path(path);

            if format == OutputFormat::Json {
                let entries: Vec<_> = children.iter().map(|node| node_summary(*node)).collect();
                return to_json(&entries);
            }
            if children.is_empty() {
                return Ok(format!("{} is empty", folder.meta.path));
            }
            let mut table = Table::new();
            table.load_preset(UTF8_BORDERS_ONLY);
            table.set_header(vec!["Name", "Type", "Size", "Modified"]);
            for node in children {
                let (kind, size) = match node {
                    NodeRef::Folder(sub) => ("folder", format!("{} items", sub.len())),
                    NodeRef::File(file) => ("file", format!("{} B", file.size())),
                };
                table.add_row(vec![
                    node.name().to_string(),
                    kind.to_string(),
                    size,
                    node.meta().modified_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                ]);
            }
            Ok(table.to_string())
        })
    }

    fn handle_stat(&self, path: &str, format: &str) -> Result<String, ApiError> {
        let format = OutputFormat::parse(format)?;
        self.vfs.with(|svc| -> Result<String, ApiError> {
            let node = svc
                .get_item(path)
                .ok_or_else(|| VfsError::NotFound(VfsPath::parse(path).to_string()))?;
            let summary = node_summary(node);
            if format == OutputFormat::Json {
                return to_json(&summary);
            }
            let meta = node.meta();
            let mut out = String::new();
            out.push_str(&format!("Path:     {}\n", meta.path));
            out.push_str(&format!("Type:     {}\n", kind_label(node)));
            out.push_str(&format!("Id:       {}\n", meta.id));
            if let Some(parent_id) = meta.parent_id {
                out.push_str(&format!("Parent:   {}\n", parent_id));
            }
            match node {
                NodeRef::Folder(folder) => out.push_str(&format!("Children: {}\n", folder.len())),
                NodeRef::File(file) => {
                    out.push_str(&format!("Size:     {} B\n", file.size()));
                    out.push_str(&format!("Encoded:  {}\n", file.is_encoded()));
                }
            }
            out.push_str(&format!("Created:  {}\n", meta.created_at.to_rfc3339()));
            out.push_str(&format!("Modified: {}", meta.modified_at.to_rfc3339()));
            Ok(out)
        })
    }

    fn handle_write(&self, path: &str, content: &str) -> Result<String, ApiError> {
        let written = self.vfs.with(|svc| -> Result<String, VfsError> {
            if svc.get_item(path).is_some() {
                svc.update_file_content(path, content)
            } else {
                let (parent, name) = split_target(path)?;
                svc.create_file(&parent, &name, content)
            }
        })?;
        Ok(format!("Wrote {} ({} B)", written, content.len()))
    }

    fn handle_tree(&self, path: &str) -> Result<String, ApiError> {
        self.vfs.with(|svc| -> Result<String, ApiError> {
            match svc.get_item(path) {
                Some(NodeRef::Folder(folder)) => {
                    let mut out = format!("{}\n", folder.meta.path);
                    render_children(folder, "", &mut out);
                    Ok(out.trim_end().to_string())
                }
                Some(NodeRef::File(file)) => {
                    Ok(format!("{} ({} B)", file.meta.path, file.size()))
                }
                None => Err(VfsError::NotFound(VfsPath::parse(path).to_string()).into()),
            }
        })
    }

    fn handle_decode(&self, path: &str, format: &str) -> Result<String, ApiError> {
        let format = OutputFormat::parse(format)?;
        let decoded = self.vfs.decode_file(path)?;
        if format == OutputFormat::Json {
            return to_json(&decoded);
        }
        let ellipsis = if decoded.truncated { "..." } else { "" };
        Ok(format!(
            "Seed fingerprint: {}\nLength:           {} B\nDigest:           {}\nPreview:          {:?}{}",
            decoded.seed_fingerprint, decoded.original_len, decoded.digest, decoded.preview, ellipsis
        ))
    }

    fn handle_validate(&self, format: &str) -> Result<String, ApiError> {
        let format = OutputFormat::parse(format)?;
        let report = self.vfs.validate();
        if format == OutputFormat::Json {
            return to_json(&report);
        }
        if !report.is_valid() {
            return Err(VfsError::Corrupted(report.errors.join("; ")).into());
        }
        let mut out = format!("Tree is valid ({} nodes)", report.node_count);
        for warning in &report.warnings {
            out.push_str(&format!("\n  {} {}", "warning:".yellow(), warning));
        }
        Ok(out)
    }

    fn handle_status(&self, format: &str) -> Result<String, ApiError> {
        let format = OutputFormat::parse(format)?;
        let (origin, fingerprint, stats) = self.vfs.with(|svc| {
            (
                svc.origin().clone(),
                svc.codec().fingerprint().to_string(),
                svc.stats(),
            )
        });
        let backend = match self.backend {
            StorageBackend::Sled => "sled",
            StorageBackend::Memory => "memory",
        };
        let store_path = self
            .store_path
            .as_ref()
            .map(|p| p.display().to_string());

        if format == OutputFormat::Json {
            return to_json(&json!({
                "store": { "backend": backend, "path": store_path },
                "origin": describe_origin(&origin),
                "seed_fingerprint": fingerprint,
                "stats": stats,
            }));
        }

        let mut out = String::new();
        out.push_str(&format!("{}\n", "Store".bold().underline()));
        out.push_str(&format!("  Backend: {}\n", backend));
        if let Some(path) = &store_path {
            out.push_str(&format!("  Path:    {}\n", path));
        }
        out.push_str(&format!("  Loaded:  {}\n\n", describe_origin(&origin)));
        out.push_str(&format!("{}\n", "Codec".bold().underline()));
        out.push_str(&format!("  Seed fingerprint: {}\n\n", fingerprint));
        out.push_str(&format!("{}\n", "Tree".bold().underline()));
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["Folders", "Files", "Content", "Encoded"]);
        table.add_row(vec![
            stats.folders.to_string(),
            stats.files.to_string(),
            format!("{} B", stats.content_bytes),
            format!("{} B", stats.encoded_bytes),
        ]);
        out.push_str(&table.to_string());
        Ok(out)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    fn parse(format: &str) -> Result<Self, ApiError> {
        match format {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ApiError::ConfigError(format!(
                "Invalid format: {} (must be 'text' or 'json')",
                format
            ))),
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::ConfigError(format!("Failed to serialize output: {}", e)))
}

/// Split `/a/b/c` into (`/a/b`, `c`).
fn split_target(path: &str) -> Result<(String, String), VfsError> {
    let parsed = VfsPath::parse(path);
    match (parsed.parent(), parsed.leaf()) {
        (Some(parent), Some(leaf)) => Ok((parent.to_string(), leaf.to_string())),
        _ => Err(VfsError::InvalidName(path.to_string())),
    }
}

fn kind_label(node: NodeRef<'_>) -> &'static str {
    if node.is_folder() {
        "folder"
    } else {
        "file"
    }
}

fn node_summary(node: NodeRef<'_>) -> serde_json::Value {
    let meta = node.meta();
    let mut value = json!({
        "id": meta.id,
        "name": meta.name,
        "type": kind_label(node),
        "path": meta.path,
        "parent_id": meta.parent_id,
        "created_at": meta.created_at,
        "modified_at": meta.modified_at,
    });
    match node {
        NodeRef::Folder(folder) => value["children"] = json!(folder.len()),
        NodeRef::File(file) => {
            value["size"] = json!(file.size());
            value["is_encoded"] = json!(file.is_encoded());
        }
    }
    value
}

fn render_children(folder: &FolderNode, prefix: &str, out: &mut String) {
    let count = folder.len();
    for (index, child) in folder.children().enumerate() {
        let last = index + 1 == count;
        let branch = if last { "└── " } else { "├── " };
        match child {
            Node::Folder(sub) => {
                out.push_str(&format!("{}{}{}/\n", prefix, branch, sub.meta.name));
                let nested = format!("{}{}", prefix, if last { "    " } else { "│   " });
                render_children(sub, &nested, out);
            }
            Node::File(file) => {
                out.push_str(&format!(
                    "{}{}{} ({} B)\n",
                    prefix,
                    branch,
                    file.meta.name,
                    file.size()
                ));
            }
        }
    }
}

fn describe_origin(origin: &TreeOrigin) -> String {
    match origin {
        TreeOrigin::Stored => "stored tree".to_string(),
        TreeOrigin::Reencoded { files } => format!("stored tree, {} files re-encoded", files),
        TreeOrigin::Bootstrap => "bootstrap layout (nothing stored)".to_string(),
        TreeOrigin::Recovered { reason } => {
            format!("bootstrap layout (stored tree was corrupted: {})", reason)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CodecConfig, StorageConfig};
    use crate::error::ErrorKind;
    use crate::notify::NullNotifier;

    fn memory_context() -> CliContext {
        let config = VfsConfig {
            storage: StorageConfig {
                backend: StorageBackend::Memory,
                path: None,
            },
            codec: CodecConfig {
                seed: Some("cli-tests".to_string()),
                ..CodecConfig::default()
            },
            ..VfsConfig::default()
        };
        CliContext::new(&config, NullNotifier).unwrap()
    }

    fn run(ctx: &CliContext, args: &[&str]) -> Result<String, ApiError> {
        let mut argv = vec!["simvfs"];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv).unwrap();
        ctx.execute(&cli.command)
    }

    fn kind_of(err: ApiError) -> Option<ErrorKind> {
        match err {
            ApiError::Vfs(e) => Some(e.kind()),
            _ => None,
        }
    }

    #[test]
    fn test_write_then_cat() {
        let ctx = memory_context();
        let out = run(&ctx, &["write", "/home/user/documents/a.txt", "hello"]).unwrap();
        assert_eq!(out, "Wrote /home/user/documents/a.txt (5 B)");
        assert_eq!(run(&ctx, &["cat", "/home/user/documents/a.txt"]).unwrap(), "hello");

        run(&ctx, &["write", "/home/user/documents/a.txt", "bye"]).unwrap();
        assert_eq!(run(&ctx, &["cat", "/home/user/documents/a.txt"]).unwrap(), "bye");
    }

    #[test]
    fn test_mkdir_touch_and_tree() {
        let ctx = memory_context();
        run(&ctx, &["mkdir", "/tmp/work"]).unwrap();
        run(&ctx, &["touch", "/tmp/work/empty.txt"]).unwrap();
        let tree = run(&ctx, &["tree", "/tmp"]).unwrap();
        assert_eq!(tree, "/tmp\n└── work/\n    └── empty.txt (0 B)");
    }

    #[test]
    fn test_mv_and_rm() {
        let ctx = memory_context();
        run(&ctx, &["mkdir", "/tmp/a"]).unwrap();
        assert_eq!(
            run(&ctx, &["mv", "/tmp/a", "b"]).unwrap(),
            "Renamed /tmp/a to /tmp/b"
        );
        assert!(ctx.handle().get_item("/tmp/a").is_none());
        assert_eq!(run(&ctx, &["rm", "/tmp/b"]).unwrap(), "Deleted /tmp/b");
        assert!(ctx.handle().list_path("/tmp").is_empty());
    }

    #[test]
    fn test_errors_surface_vfs_kind() {
        let ctx = memory_context();
        let err = run(&ctx, &["cat", "/nope"]).unwrap_err();
        assert_eq!(kind_of(err), Some(ErrorKind::NotFound));

        let err = run(&ctx, &["rm", "/home"]).unwrap_err();
        assert_eq!(kind_of(err), Some(ErrorKind::Protected));

        let err = run(&ctx, &["ls", "/system/version"]).unwrap_err();
        assert_eq!(kind_of(err), Some(ErrorKind::NotAFolder));

        let err = run(&ctx, &["touch", "/"]).unwrap_err();
        assert_eq!(kind_of(err), Some(ErrorKind::InvalidName));
    }

    #[test]
    fn test_ls_json_lists_children() {
        let ctx = memory_context();
        let out = run(&ctx, &["ls", "/home/user", "--format", "json"]).unwrap();
        let entries: serde_json::Value = serde_json::from_str(&out).unwrap();
        let names: Vec<&str> = entries
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["desktop", "documents", "downloads", "pictures"]);
        assert_eq!(entries[0]["type"], "folder");
    }

    #[test]
    fn test_decode_and_status() {
        let ctx = memory_context();
        run(&ctx, &["write", "/tmp/n.txt", "note"]).unwrap();
        let out = run(&ctx, &["decode", "/tmp/n.txt", "--format", "json"]).unwrap();
        let decoded: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(decoded["original_len"], 4);
        assert_eq!(decoded["preview"], "note");

        let out = run(&ctx, &["status", "--format", "json"]).unwrap();
        let status: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(status["store"]["backend"], "memory");
        assert!(status["stats"]["files"].as_u64().unwrap() >= 1);
    }

    #[test]
    fn test_validate_reports_valid_tree() {
        let ctx = memory_context();
        let out = run(&ctx, &["validate"]).unwrap();
        assert!(out.starts_with("Tree is valid"));
    }

    #[test]
    fn test_invalid_format_is_rejected() {
        let ctx = memory_context();
        assert!(matches!(
            run(&ctx, &["ls", "/", "--format", "yaml"]),
            Err(ApiError::ConfigError(_))
        ));
    }

    #[test]
    fn test_overrides_fold_into_config() {
        let cli = Cli::try_parse_from([
            "simvfs",
            "--memory",
            "--seed",
            "pinned",
            "--log-level",
            "debug",
            "status",
        ])
        .unwrap();
        let mut config = VfsConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.codec.seed.as_deref(), Some("pinned"));
        assert_eq!(config.logging.level, "debug");
    }
}
