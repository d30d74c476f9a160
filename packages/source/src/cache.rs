//! Single-flight occurrence table cache.
//!
//! [`OccurrenceCache`] is created by the composition root (server state or
//! CLI `main`) and shared via `Arc`. The first call to
//! [`OccurrenceCache::load`] fetches and normalizes the CSV; concurrent
//! callers wait on the same initialization and receive the same table. A
//! failed load leaves the cache empty.

use std::sync::Arc;

use cenipa_map_occurrence_models::OccurrenceTable;
use tokio::sync::OnceCell;

use crate::dataset::DatasetDefinition;
use crate::progress::{ProgressCallback, null_progress};
use crate::{LoadError, OccurrenceSource, load_occurrences};

/// Memoizes the normalized occurrence table for the lifetime of the cache.
pub struct OccurrenceCache {
    source: Arc<dyn OccurrenceSource>,
    definition: DatasetDefinition,
    progress: Arc<dyn ProgressCallback>,
    table: OnceCell<Arc<OccurrenceTable>>,
}

impl OccurrenceCache {
    /// Creates an empty cache backed by `source`.
    #[must_use]
    pub fn new(source: Arc<dyn OccurrenceSource>, definition: DatasetDefinition) -> Self {
        Self {
            source,
            definition,
            progress: null_progress(),
            table: OnceCell::new(),
        }
    }

    /// Reports load progress to `progress`.
    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressCallback>) -> Self {
        self.progress = progress;
        self
    }

    /// The dataset definition this cache loads.
    #[must_use]
    pub const fn definition(&self) -> &DatasetDefinition {
        &self.definition
    }

    /// Whether the table has already been loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.table.initialized()
    }

    /// Returns the cached table, loading it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the first load fails. The error is not
    /// cached.
    pub async fn load(&self) -> Result<Arc<OccurrenceTable>, LoadError> {
        let table = self
            .table
            .get_or_try_init(|| async {
                self.progress
                    .set_message(format!("Downloading {}...", self.definition.name));
                match load_occurrences(self.source.as_ref(), &self.definition).await {
                    Ok(table) => {
                        self.progress
                            .finish(format!("Loaded {} occurrences", table.len()));
                        Ok(Arc::new(table))
                    }
                    Err(e) => {
                        self.progress.finish_and_clear();
                        log::error!("[{}] Load failed: {e}", self.definition.id);
                        Err(e)
                    }
                }
            })
            .await?;

        Ok(Arc::clone(table))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::{StaticCsvSource, dataset};

    const CSV: &str = "codigo_ocorrencia,ocorrencia_classificacao,ocorrencia_tipo,ocorrencia_tipo_categoria,ocorrencia_tipo_icao,ocorrencia_latitude,ocorrencia_longitude,ocorrencia_cidade,ocorrencia_aerodromo,ocorrencia_dia,ocorrencia_horario,investigacao_status,divulgacao_relatorio_numero,total_aeronaves_envolvidas\n\
        10,ACIDENTE,T,T,X,-22.9,-43.1,RIO,SBRJ,2015-06-01,10:30:00,FINALIZADA,,1\n\
        11,INCIDENTE,T,T,X,-23.5,-46.6,SAO PAULO,SBSP,2016-02-03,08:00:00,ATIVA,,1\n";

    /// Counts fetches and delays each one so concurrent callers overlap.
    struct CountingSource {
        fetches: AtomicUsize,
    }

    #[async_trait]
    impl OccurrenceSource for CountingSource {
        fn label(&self) -> &str {
            "counting"
        }

        async fn fetch_csv(&self) -> Result<String, LoadError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(CSV.to_owned())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl OccurrenceSource for FailingSource {
        fn label(&self) -> &str {
            "failing"
        }

        async fn fetch_csv(&self) -> Result<String, LoadError> {
            Err(LoadError::Fetch {
                message: "unreachable".to_owned(),
            })
        }
    }

    fn ids(table: &OccurrenceTable) -> BTreeSet<String> {
        table.rows().iter().map(|r| r.id.clone()).collect()
    }

    #[tokio::test]
    async fn sequential_loads_return_same_table() {
        let cache = OccurrenceCache::new(
            Arc::new(StaticCsvSource::new(CSV)),
            dataset::cenipa().unwrap(),
        );
        assert!(!cache.is_loaded());

        let first = cache.load().await.unwrap();
        let second = cache.load().await.unwrap();

        assert!(cache.is_loaded());
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), second.len());
        assert_eq!(ids(&first), ids(&second));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_first_access_fetches_once() {
        let source = Arc::new(CountingSource {
            fetches: AtomicUsize::new(0),
        });
        let cache = Arc::new(OccurrenceCache::new(
            source.clone(),
            dataset::cenipa().unwrap(),
        ));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move { cache.load().await.map(|t| t.len()) })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), 2);
        }
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_load_is_not_cached() {
        let cache = OccurrenceCache::new(Arc::new(FailingSource), dataset::cenipa().unwrap());
        let err = cache.load().await.unwrap_err();
        assert!(err.is_fetch());
        assert!(!cache.is_loaded());
    }
}
