//! `netmenu list` -- drive the menu client against a running server.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use netmenu_client::{MenuApi, MenuController, MenuState};
use netmenu_core::MenuItem;

use crate::cli::ListArgs;
use crate::error::CliError;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct SiteRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "URL")]
    url: String,
    #[tabled(rename = "Admin")]
    admin: String,
}

impl From<&MenuItem> for SiteRow {
    fn from(item: &MenuItem) -> Self {
        Self {
            name: item.name.clone(),
            url: item.url.clone(),
            admin: item.admin.clone(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn run(args: ListArgs) -> Result<(), CliError> {
    let api = MenuApi::new(args.url, args.token)?;
    let boot = api.bootstrap().await?;

    let controller = MenuController::new(api, boot.order_by, args.index_file);
    controller.open();

    // Stand-in for the viewport: keep signaling "more content visible"
    // until the server sends the end-of-listing sentinel.
    while controller.current_state() != MenuState::Exhausted {
        if !controller.notify_visible().await? {
            break;
        }
    }

    let items = controller.visible_items(args.filter.as_deref());
    let rows: Vec<SiteRow> = items.iter().map(SiteRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::sharp());
    println!("{table}");
    println!("{} site(s)", items.len());
    Ok(())
}
