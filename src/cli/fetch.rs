use anyhow::{anyhow, Result};
use clap::Args;
use tracing::{debug, info};
use unicode_width::UnicodeWidthStr;

use crate::api::{HttpPageSource, PageQuery, Record};
use crate::config::Config;
use crate::feed::{loader, FeedState};
use crate::viewport::{page_size_for, StaticViewport};

/// Fetch records without the interactive view
#[derive(Args)]
pub struct FetchCommand {
    /// Page number to fetch
    #[arg(
        short = 'p',
        long = "page",
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..),
        conflicts_with = "all"
    )]
    pub page: u32,

    /// Records per page; defaults to what the viewport height fits
    #[arg(short = 's', long = "page-size")]
    pub page_size: Option<u32>,

    /// Viewport height used to size pages
    #[arg(long = "viewport-height", default_value_t = 800)]
    pub viewport_height: u32,

    /// Keep loading pages until the endpoint runs out
    #[arg(short = 'a', long = "all")]
    pub all: bool,

    /// Upper bound on requests made by --all
    #[arg(long = "max-pages", default_value_t = 1000)]
    pub max_pages: u32,

    /// Print one JSON record per line instead of a table
    #[arg(long = "json")]
    pub json: bool,
}

impl FetchCommand {
    pub async fn execute(&self, config: &Config) -> Result<()> {
        debug!("Executing fetch command");

        let source = HttpPageSource::from_config(config)?;
        let viewport = StaticViewport::at_bottom(self.effective_height(config));

        let records = if self.all {
            let (mut feed, first) = FeedState::mount(&viewport, config.feed_config()?);
            let summary =
                loader::load_until_exhausted(&source, &mut feed, first, &viewport, self.max_pages).await?;
            info!(
                "Loaded {} records in {} pages (exhausted: {})",
                summary.records, summary.pages, summary.exhausted
            );
            feed.records().to_vec()
        } else {
            let feed_config = config.feed_config()?;
            let query = PageQuery {
                page_number: self.page,
                page_size: page_size_for(viewport.height, feed_config.row_height),
                order_by: feed_config.order_by,
                direction: feed_config.direction,
            };
            loader::fetch_records(&source, &query)
                .await
                .map_err(|e| anyhow!("Page {} failed: {}", self.page, e))?
        };

        if self.json {
            for record in &records {
                println!("{}", serde_json::to_string(record)?);
            }
        } else {
            print!("{}", format_table(&records));
        }

        Ok(())
    }

    /// An explicit page size wins over the viewport height
    fn effective_height(&self, config: &Config) -> u32 {
        match self.page_size {
            Some(size) => size.max(1).saturating_mul(config.row_height.max(1)),
            None => self.viewport_height,
        }
    }
}

/// Plain-text rendition of the record table
pub fn format_table(records: &[Record]) -> String {
    const NAME_HEADER: &str = "Category Name";
    const SEQUENCE_HEADER: &str = "Sequence";

    let name_width = records
        .iter()
        .map(|r| r.display_name().width())
        .chain(std::iter::once(NAME_HEADER.width()))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    push_row(&mut out, NAME_HEADER, SEQUENCE_HEADER, name_width);
    for record in records {
        push_row(&mut out, record.display_name(), &record.display_sequence(), name_width);
    }
    out
}

fn push_row(out: &mut String, name: &str, sequence: &str, name_width: usize) {
    out.push_str(name);
    out.push_str(&" ".repeat(name_width - name.width() + 2));
    out.push_str(sequence);
    out.push('\n');
}
