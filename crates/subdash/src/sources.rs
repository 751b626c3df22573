use crate::prelude::{println, *};
use serde::{Deserialize, Serialize};
use subdash_core::filter::{source_channel_counts, source_channel_options, ALL_SOURCES};
use subdash_core::model::Subscriber;

use crate::api::{load_session, ready_view};

/// Options for the sources command
#[derive(Debug, clap::Args, Serialize, Deserialize, Clone)]
pub struct SourcesOptions {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// One selectable source/channel group
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct SourceGroup {
    pub key: String,
    pub subscribers: usize,
}

pub async fn run(options: SourcesOptions, global: crate::Global) -> Result<()> {
    let config = global.api_config();
    if global.verbose {
        println!("Fetching subscribers from {}...", config.subscribers_url());
    }

    let session = load_session(&config).await?;
    // Surfaces the fetch error, if any.
    ready_view(&session)?;
    let groups = source_groups(session.subscribers());

    if options.json {
        let json = serde_json::to_string_pretty(&groups)
            .map_err(|e| eyre!("JSON serialization failed: {}", e))?;
        println!("{}", json);
    } else {
        let mut table = crate::prelude::new_table();
        table.set_titles(prettytable::row![b->"Source / Channel", b->"Subscribers"]);
        for group in &groups {
            table.add_row(prettytable::row![group.key, r->group.subscribers]);
        }
        table.printstd();
        println!("\nFilter with: subdash list --source <SOURCE/CHANNEL>");
    }

    Ok(())
}

/// Selector options in display order, with the number of records in each.
pub fn source_groups(records: &[Subscriber]) -> Vec<SourceGroup> {
    let counts = source_channel_counts(records);
    source_channel_options(records)
        .into_iter()
        .map(|key| {
            let subscribers = if key == ALL_SOURCES {
                records.len()
            } else {
                counts.get(&key).copied().unwrap_or(0)
            };
            SourceGroup { key, subscribers }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_subscriber(id: &str, source: Option<&str>, channel: Option<&str>) -> Subscriber {
        let mut sub = Subscriber::new(id, format!("{id}@x.com"), "active");
        sub.utm_source = source.map(str::to_string);
        sub.utm_channel = channel.map(str::to_string);
        sub
    }

    #[test]
    fn test_source_groups() {
        let records = vec![
            create_test_subscriber("1", Some("twitter"), Some("social")),
            create_test_subscriber("2", None, None),
            create_test_subscriber("3", Some("twitter"), Some("social")),
        ];

        let groups = source_groups(&records);

        assert_eq!(
            groups,
            vec![
                SourceGroup {
                    key: "all".to_string(),
                    subscribers: 3
                },
                SourceGroup {
                    key: "-/-".to_string(),
                    subscribers: 1
                },
                SourceGroup {
                    key: "twitter/social".to_string(),
                    subscribers: 2
                },
            ]
        );
    }

    #[test]
    fn test_source_groups_empty() {
        let groups = source_groups(&[]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].subscribers, 0);
    }
}
