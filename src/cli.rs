use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::debug;

use resource_console::api::types::SessionSnapshot;
use resource_console::api::JsonClient;
use resource_console::config::{Config, DEFAULT_CONFIG_PATH};
use resource_console::resources::list::{DeleteOutcome, ResourceList, DELETE_PROMPT};
use resource_console::resources::openai::{OpenAiPage, OpenAiPageData};
use resource_console::resources::prompt::{PromptPage, PromptPageData};
use resource_console::resources::telegram::dialog::Dismissal;
use resource_console::resources::telegram::{TelegramPage, TelegramPageData};
use resource_console::resources::{ResourceId, ResourceKind};
use resource_console::ui::StatusDisplay;

/// Back link rendered on every resource page.
const LIST_HREF: &str = "/ui/resources";

#[derive(Debug, Parser)]
#[command(
    name = "resource-console",
    version,
    about = "Drive the resource admin console from a terminal"
)]
pub struct Cli {
    /// Config file (TOML). Defaults to ./console.toml when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Resource API origin, e.g. http://127.0.0.1:8000
    #[arg(long, global = true, env = "RESOURCE_CONSOLE_BASE_URL")]
    pub base_url: Option<String>,

    /// Access token appended to every request as `?token=`
    #[arg(long, global = true, env = "RESOURCE_CONSOLE_TOKEN")]
    pub token: Option<String>,

    /// Console page URL to take the token from
    #[arg(long, global = true)]
    pub page_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a resource and print its page
    Create {
        #[arg(long)]
        kind: Option<ResourceKind>,
        #[arg(long, default_value = "")]
        title: String,
    },
    /// Delete a resource
    Delete {
        id: ResourceId,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// OpenAI key page
    Openai {
        id: ResourceId,
        #[command(subcommand)]
        action: OpenAiAction,
    },
    /// Prompt configuration page
    Prompt {
        id: ResourceId,
        #[command(subcommand)]
        action: PromptAction,
    },
    /// Telegram session page
    Telegram {
        id: ResourceId,
        #[command(subcommand)]
        action: TelegramAction,
    },
}

/// What the page shows for an already stored secret.
#[derive(Debug, Args)]
pub struct StoredSecret {
    /// A secret is already stored for this resource
    #[arg(long)]
    pub stored: bool,
    /// Mask rendered for the stored secret
    #[arg(long)]
    pub mask: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum OpenAiAction {
    Save {
        key: String,
        #[command(flatten)]
        secret: StoredSecret,
    },
    /// Check the given key, or the stored one
    Check {
        key: Option<String>,
        #[command(flatten)]
        secret: StoredSecret,
    },
}

#[derive(Debug, Subcommand)]
pub enum PromptAction {
    Save {
        #[arg(long, default_value = "")]
        model: String,
        #[arg(long, default_value = "")]
        system_prompt: String,
        /// 0..50, blank to unset
        #[arg(long)]
        history_pairs: Option<String>,
        /// Google source URL (repeatable)
        #[arg(long = "source")]
        sources: Vec<String>,
        #[arg(long)]
        out_of_scope: bool,
    },
}

/// Session snapshot the page was rendered with.
#[derive(Debug, Args)]
pub struct SessionArgs {
    #[arg(long)]
    pub activated: bool,
    #[arg(long)]
    pub enabled: bool,
    #[arg(long)]
    pub session_id: Option<String>,
}

impl SessionArgs {
    fn snapshot(self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.session_id,
            is_enabled: self.enabled,
            is_activated: self.activated,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum TelegramAction {
    Save {
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        api_id: Option<String>,
        /// New API hash; an empty value clears the stored one
        #[arg(long)]
        api_hash: Option<String>,
        /// An API hash is already stored
        #[arg(long)]
        hash_stored: bool,
        #[arg(long)]
        openai_resource: Option<String>,
        #[arg(long)]
        prompt_resource: Option<String>,
    },
    /// Send a login code and confirm it interactively
    Activate {
        #[arg(long)]
        phone: String,
        #[command(flatten)]
        session: SessionArgs,
    },
    /// Enable or disable an activated session
    Toggle {
        #[command(flatten)]
        session: SessionArgs,
    },
}

impl Cli {
    /// File config with command line overrides applied.
    pub fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::load_or_default(&PathBuf::from(DEFAULT_CONFIG_PATH))?,
        };
        if let Some(base_url) = &self.base_url {
            config.api.base_url = base_url.clone();
        }
        if let Some(token) = &self.token {
            config.api.token = Some(token.clone());
        }
        if let Some(page_url) = &self.page_url {
            config.api.page_url = Some(page_url.clone());
        }
        Ok(config)
    }
}

/// Runs one console action. Returns whether it succeeded.
pub async fn run(command: Command, config: &Config) -> Result<bool> {
    let client = config.client()?;
    debug!("Resource API at {}", config.api.base_url);

    let ok = match command {
        Command::Create { kind, title } => create(client, kind, &title).await,
        Command::Delete { id, yes } => delete(client, id, yes).await,
        Command::Openai { id, action } => openai(client, config, id, action).await,
        Command::Prompt { id, action } => prompt(client, id, action).await,
        Command::Telegram { id, action } => telegram(client, config, id, action).await?,
    };
    Ok(ok)
}

fn print_status(status: &StatusDisplay) {
    if let Some(current) = status.current() {
        debug!(
            "{} status shown at {}",
            current.kind,
            current.shown_at.format("%H:%M:%S%.3f")
        );
        println!("{current}");
    }
}

fn read_line(prompt: &str) -> Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut buf = String::new();
    io::stdin().read_line(&mut buf)?;
    Ok(buf.trim().to_owned())
}

async fn create(client: JsonClient, kind: Option<ResourceKind>, title: &str) -> bool {
    let mut list = ResourceList::new(client, Vec::new());
    let result = list.create(kind, title).await;
    print_status(&list.status);
    match result {
        Ok(nav) => {
            println!("{}", nav.href);
            true
        }
        Err(_) => false,
    }
}

async fn delete(client: JsonClient, id: ResourceId, yes: bool) -> bool {
    let mut list = ResourceList::new(client, Vec::new());
    let result = list
        .delete(id, |prompt| {
            yes || read_line(&format!("{prompt} [y/N] "))
                .map(|answer| matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"))
                .unwrap_or(false)
        })
        .await;
    print_status(&list.status);
    match result {
        Ok(DeleteOutcome::Deleted) => {
            println!("[ok] Deleted resource {id}.");
            true
        }
        Ok(DeleteOutcome::Declined) => {
            debug!("{} declined", DELETE_PROMPT);
            true
        }
        Err(_) => false,
    }
}

async fn openai(client: JsonClient, config: &Config, id: ResourceId, action: OpenAiAction) -> bool {
    let new_page = |secret: &StoredSecret| {
        OpenAiPage::new(
            client.clone(),
            OpenAiPageData {
                resource_id: id,
                has_key: secret.stored,
                key_mask: secret.mask.clone(),
            },
            config.masks.openai_key_len,
            LIST_HREF,
        )
    };

    match action {
        OpenAiAction::Save { key, secret } => {
            let mut page = new_page(&secret);
            page.key.focus();
            page.key.input(&key);
            let ok = page.save().await.is_ok();
            print_status(&page.status);
            ok
        }
        OpenAiAction::Check { key, secret } => {
            let mut page = new_page(&secret);
            if let Some(key) = key {
                page.key.focus();
                page.key.input(&key);
            }
            let ok = page.check().await.is_ok();
            print_status(&page.status);
            ok
        }
    }
}

async fn prompt(client: JsonClient, id: ResourceId, action: PromptAction) -> bool {
    let PromptAction::Save {
        model,
        system_prompt,
        history_pairs,
        sources,
        out_of_scope,
    } = action;

    let mut page = PromptPage::new(
        client,
        PromptPageData {
            resource_id: id,
            ..Default::default()
        },
        LIST_HREF,
    );
    page.model = model;
    page.system_prompt = system_prompt;
    page.history_pairs = history_pairs.unwrap_or_default();
    page.out_of_scope_enabled = out_of_scope;
    for url in &sources {
        let row = page.add_source();
        page.set_source(row, url);
    }

    let ok = page.save().await.is_ok();
    print_status(&page.status);
    ok
}

async fn telegram(
    client: JsonClient,
    config: &Config,
    id: ResourceId,
    action: TelegramAction,
) -> Result<bool> {
    let new_page = |session: SessionSnapshot, has_hash: bool| {
        TelegramPage::new(
            client.clone(),
            TelegramPageData {
                resource_id: id,
                has_hash,
                session,
                ..Default::default()
            },
            config.masks.telegram_hash_len,
            LIST_HREF,
        )
    };

    let ok = match action {
        TelegramAction::Save {
            phone,
            api_id,
            api_hash,
            hash_stored,
            openai_resource,
            prompt_resource,
        } => {
            let mut page = new_page(SessionSnapshot::default(), hash_stored);
            page.phone = phone.unwrap_or_default();
            page.api_id = api_id.unwrap_or_default();
            page.openai_resource = openai_resource.unwrap_or_default();
            page.prompt_resource = prompt_resource.unwrap_or_default();
            if let Some(hash) = api_hash {
                page.api_hash.focus();
                page.api_hash.input(&hash);
            }
            let ok = page.save().await.is_ok();
            print_status(&page.status);
            ok
        }
        TelegramAction::Activate { phone, session } => {
            let mut page = new_page(session.snapshot(), false);
            page.phone = phone;
            let started = page.activate().await.is_ok();
            print_status(&page.status);

            let mut ok = started;
            while page.dialog.is_open() {
                let code = read_line("Confirmation code (empty to cancel): ")?;
                if code.is_empty() {
                    page.dismiss_dialog(Dismissal::Cancel);
                    println!("[info] Activation dialog closed.");
                    ok = false;
                    break;
                }
                page.dialog.code = code;
                ok = page.confirm_code().await.is_ok();
                if ok {
                    print_status(&page.status);
                } else {
                    print_status(&page.dialog.status);
                }
            }
            println!("{}", page.lamp().text);
            ok
        }
        TelegramAction::Toggle { session } => {
            let mut page = new_page(session.snapshot(), false);
            let ok = page.toggle_enabled().await.is_ok();
            print_status(&page.status);
            println!("{}", page.lamp().text);
            if page.toggle_visible() {
                println!("Next action: {}", page.toggle_label());
            }
            ok
        }
    };
    Ok(ok)
}
