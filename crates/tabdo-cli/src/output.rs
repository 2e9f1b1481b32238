//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use tabdo_core::{Item, ListConfig, Priority};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Print a single item
    pub fn print_item(&self, item: &Item) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:       {}", item.id);
                println!("Text:     {}", item.text);
                println!("Priority: {}", item.priority);
                println!("Done:     {}", if item.done { "yes" } else { "no" });
                if let Some(created) = item.created_at() {
                    println!("Created:  {}", created.format("%Y-%m-%d %H:%M"));
                }
            }
            OutputFormat::Json => {
                println!("{}", to_json(item));
            }
            OutputFormat::Quiet => {
                println!("{}", item.id);
            }
        }
    }

    /// Print the items of a list in order
    pub fn print_items(&self, list: &str, items: &[Item]) {
        match self.format {
            OutputFormat::Human => {
                println!("{}", list);
                println!("{}", "─".repeat(list.chars().count().max(8)));
                if items.is_empty() {
                    println!("No items.");
                    return;
                }
                for (pos, item) in items.iter().enumerate() {
                    println!("{}", item_line(pos + 1, item));
                }
                let done = items.iter().filter(|i| i.done).count();
                println!("\n{} item(s), {} done", items.len(), done);
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    to_json(&serde_json::json!({ "list": list, "items": items }))
                );
            }
            OutputFormat::Quiet => {
                for item in items {
                    println!("{}", item.id);
                }
            }
        }
    }

    /// Print the registered lists
    pub fn print_lists(&self, lists: &[ListConfig], default: &str) {
        match self.format {
            OutputFormat::Human => {
                for list in lists {
                    let marker = if list.name == default { "*" } else { " " };
                    println!("{} {:<20} {}", marker, list.name, list.store_id);
                }
                println!("\n{} list(s), * = default", lists.len());
            }
            OutputFormat::Json => {
                let json_lists: Vec<_> = lists
                    .iter()
                    .map(|l| {
                        serde_json::json!({
                            "name": l.name,
                            "store_id": l.store_id,
                            "default": l.name == default
                        })
                    })
                    .collect();
                println!("{}", to_json(&json_lists));
            }
            OutputFormat::Quiet => {
                for list in lists {
                    println!("{}", list.name);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a warning to stderr (shown unless quiet)
    pub fn warning(&self, msg: &str) {
        if !self.is_quiet() {
            eprintln!("⚠ {}", msg);
        }
    }
}

/// One line of the human item listing
fn item_line(pos: usize, item: &Item) -> String {
    let check = if item.done { "x" } else { " " };
    let priority = match item.priority {
        Priority::Normal => String::new(),
        other => format!(" ({})", other),
    };
    format!(
        "{:>3}. [{}] {}{}  {}",
        pos,
        check,
        truncate(&item.text, 50),
        priority,
        item.id
    )
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
