use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::PhaseMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: PhaseMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: PhaseMonitor::new(monitor_enabled),
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<P::Summary> {
        tracing::info!("Starting pipeline");

        let items = self.pipeline.extract().await?;
        tracing::info!("Extracted {} items", items.len());
        self.monitor.log_phase("extract");

        let batch = self.pipeline.transform(items).await?;
        self.monitor.log_phase("transform");

        let summary = self.pipeline.load(batch).await?;
        self.monitor.log_phase("load");

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::HarvestError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingPipeline {
        loads: AtomicUsize,
        fail_extract: bool,
    }

    #[async_trait]
    impl Pipeline for CountingPipeline {
        type Item = u32;
        type Batch = u32;
        type Summary = String;

        async fn extract(&self) -> Result<Vec<u32>> {
            if self.fail_extract {
                return Err(HarvestError::NoInputError {
                    message: "empty".to_string(),
                });
            }
            Ok(vec![1, 2, 3])
        }

        async fn transform(&self, items: Vec<u32>) -> Result<u32> {
            Ok(items.iter().sum())
        }

        async fn load(&self, batch: u32) -> Result<String> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(format!("total={}", batch))
        }
    }

    #[tokio::test]
    async fn test_run_chains_phases() {
        let engine = EtlEngine::new(CountingPipeline {
            loads: AtomicUsize::new(0),
            fail_extract: false,
        });

        assert_eq!(engine.run().await.unwrap(), "total=6");
        assert_eq!(engine.pipeline().loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_extract_failure_skips_load() {
        let engine = EtlEngine::new_with_monitoring(
            CountingPipeline {
                loads: AtomicUsize::new(0),
                fail_extract: true,
            },
            true,
        );

        assert!(engine.run().await.is_err());
        assert_eq!(engine.pipeline().loads.load(Ordering::SeqCst), 0);
    }
}
