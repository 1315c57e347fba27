//! Line-oriented presentation layer: renders the view model to stdout and
//! parses user commands. No task-state policy lives here.

use crawldash_core::{AppViewModel, ServiceHealth, TaskRowView, UrlFetchOutcome};

/// One parsed user command, before id resolution and form validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiIntent {
    Crawl {
        domains_raw: String,
        depth_raw: String,
    },
    Select { task_ref: String },
    Cancel { task_ref: String },
    Urls { domain: String },
    Clear,
    Help,
    Quit,
}

pub fn parse_intent(line: &str) -> Result<UiIntent, String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    match tokens.as_slice() {
        ["crawl", rest @ ..] if rest.len() >= 2 => {
            // Everything up to the final token is the domain list; domains
            // may be separated by commas, spaces, or both.
            let depth_raw = rest[rest.len() - 1].to_string();
            let domains_raw = rest[..rest.len() - 1].join(",");
            Ok(UiIntent::Crawl {
                domains_raw,
                depth_raw,
            })
        }
        ["crawl", ..] => Err("Usage: crawl <domains> <max-depth>".to_string()),
        ["select", task_ref] => Ok(UiIntent::Select {
            task_ref: (*task_ref).to_string(),
        }),
        ["cancel", task_ref] => Ok(UiIntent::Cancel {
            task_ref: (*task_ref).to_string(),
        }),
        ["urls", domain] => Ok(UiIntent::Urls {
            domain: (*domain).to_string(),
        }),
        ["clear"] => Ok(UiIntent::Clear),
        ["help"] | ["?"] => Ok(UiIntent::Help),
        ["quit"] | ["exit"] | ["q"] => Ok(UiIntent::Quit),
        _ => Err(format!("Unrecognized command {line:?}; try 'help'")),
    }
}

pub fn print_help() {
    println!(
        "Commands:\n  \
         crawl <domains> <max-depth>   submit a new crawl (depth 1-5)\n  \
         select <task-id>              view a task (id prefix is enough)\n  \
         cancel <task-id>              cancel a running task\n  \
         urls <domain>                 list extracted URLs for the selected task\n  \
         clear                         drop all tasks from the list and cache\n  \
         quit                          exit"
    );
}

pub fn render(view: &AppViewModel) {
    println!();
    render_service(&view.service);

    if let Some(notice) = &view.notice {
        println!("! {notice}");
    }

    if view.tasks.is_empty() {
        println!("No crawler tasks. Start one with: crawl <domains> <max-depth>");
    } else {
        println!("Tasks:");
        for row in &view.tasks {
            render_task_row(row);
        }
    }

    if let Some(panel) = &view.url_panel {
        match &panel.outcome {
            UrlFetchOutcome::Loading => {
                println!("Fetching URLs for {} ...", panel.domain);
            }
            UrlFetchOutcome::Loaded(urls) if urls.is_empty() => {
                println!(
                    "No URLs found for {}. If the crawl is still in progress, try again later.",
                    panel.domain
                );
            }
            UrlFetchOutcome::Loaded(urls) => {
                println!("Found {} URLs for {}:", urls.len(), panel.domain);
                for url in urls {
                    println!("  {url}");
                }
            }
            UrlFetchOutcome::Failed(reason) => {
                println!("Failed to fetch URLs for {}: {}", panel.domain, reason);
            }
        }
    } else if let Some(task) = &view.selected_task {
        println!(
            "Selected task {}: urls <domain> with one of: {}",
            short_id(&task.task_id),
            task.domains.join(", ")
        );
    }
}

fn render_service(service: &ServiceHealth) {
    match service {
        ServiceHealth::Unknown => println!("Service: checking..."),
        ServiceHealth::Reachable {
            healthy,
            components,
        } => {
            let overall = if *healthy { "healthy" } else { "degraded" };
            let detail = components
                .iter()
                .map(|component| {
                    format!(
                        "{} {}",
                        component.name,
                        if component.up { "UP" } else { "DOWN" }
                    )
                })
                .collect::<Vec<_>>()
                .join(", ");
            if detail.is_empty() {
                println!("Service: {overall}");
            } else {
                println!("Service: {overall} ({detail})");
            }
        }
        ServiceHealth::Unreachable { detail } => {
            println!("Service: UNAVAILABLE ({detail})");
        }
    }
}

fn render_task_row(row: &TaskRowView) {
    let marker = if row.selected { ">" } else { " " };
    let cancel_hint = if row.cancellable { " [cancellable]" } else { "" };
    println!(
        "{} [{}] {}  id={} depth={} created={}{}",
        marker,
        row.status,
        row.domains.join(", "),
        short_id(&row.task_id),
        row.max_depth,
        row.created_at,
        cancel_hint
    );
}

fn short_id(task_id: &str) -> &str {
    task_id.get(..8).unwrap_or(task_id)
}
