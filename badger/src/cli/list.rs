// badger/src/cli/list.rs
use badger_common::config::Config;
use badger_common::error::Result;
use badger_core::Ledger;
use clap::Args;
use colored::Colorize;
use prettytable::{format, Cell, Row, Table};

#[derive(Args, Debug)]
pub struct List {
    /// Also show where each bundle was installed from
    #[arg(long)]
    pub sources: bool,
}

impl List {
    pub fn run(&self, config: &Config) -> Result<()> {
        let ledger = Ledger::load(config.ledger_path());
        let apps = ledger.list_all();

        if apps.is_empty() {
            println!("{}", "No AppImages installed".yellow());
            println!("Install location: {}", config.applications_dir().display());
            return Ok(());
        }

        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
        let mut header = vec![
            Cell::new("Name").style_spec("b"),
            Cell::new("Version").style_spec("b"),
            Cell::new("Installed").style_spec("b"),
            Cell::new("Categories").style_spec("b"),
        ];
        if self.sources {
            header.push(Cell::new("Source").style_spec("b"));
        }
        table.add_row(Row::new(header));

        for app in &apps {
            let mut row = vec![
                Cell::new(&app.name).style_spec("Fb"),
                Cell::new(&app.version),
                Cell::new(&short_date(&app.install_date)),
                Cell::new(&app.categories.join(", ")),
            ];
            if self.sources {
                row.push(Cell::new(&app.source_path));
            }
            table.add_row(Row::new(row));
        }
        table.printstd();

        println!("{}", format!("{} AppImages installed", apps.len()).bold());
        println!("Ledger: {}", ledger.path().display());
        println!("Applications folder: {}", config.applications_dir().display());
        Ok(())
    }
}

/// `2024-03-01T09:00:00.000000` shown as `2024-03-01 09:00`.
fn short_date(iso: &str) -> String {
    match iso.get(..16) {
        Some(prefix) => prefix.replacen('T', " ", 1),
        None => iso.to_string(),
    }
}
