use std::path::PathBuf;

use crate::config::{ApiKey, Profile};
use crate::crawl::{CrawlDispatcher, CrawlService};
use crate::errors::LeadError;
use crate::export::export;
use crate::search::{SearchService, run_search};

/// What one run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Unique, unblocked urls found by the search stage.
    pub urls: Vec<String>,
    /// Records returned by the extraction service, including failed ones.
    pub records: usize,
    /// Rows written to the output file.
    pub rows: usize,
    /// `None` for dry runs.
    pub output: Option<PathBuf>,
}

/// Search, crawl and export, in that order, once.
pub struct Pipeline<S, C> {
    search: S,
    crawl: C,
    api_key: ApiKey,
    profile: Profile,
    concurrency: usize,
    dry_run: bool,
}

impl<S, C> Pipeline<S, C>
where
    S: SearchService,
    C: CrawlService,
{
    pub fn new(search: S, crawl: C, api_key: ApiKey, profile: Profile) -> Self {
        Pipeline {
            search,
            crawl,
            api_key,
            profile,
            concurrency: 1,
            dry_run: false,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Stop after the search stage.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub async fn run(&self) -> Result<RunSummary, LeadError> {
        self.profile.validate()?;
        log::info!("starting run with profile {}", self.profile.name);

        let urls = run_search(&self.search, &self.api_key, &self.profile).await?;
        for url in &urls {
            log::debug!("candidate: {url}");
        }
        if self.dry_run {
            log::info!("dry run, skipping crawl and export");
            return Ok(RunSummary {
                urls,
                ..Default::default()
            });
        }

        let records = CrawlDispatcher::new(&self.crawl, &self.api_key, self.profile.batch_size)
            .with_region(self.profile.region.clone())
            .with_concurrency(self.concurrency)
            .run(urls.clone())
            .await?;
        let record_count = records.len();

        let rows = export(records, &self.profile.output, self.profile.schema)?;

        Ok(RunSummary {
            urls,
            records: record_count,
            rows,
            output: Some(self.profile.output.clone()),
        })
    }
}
