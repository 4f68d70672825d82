use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// 依序執行 extract → enrich → load，回傳輸出檔路徑。
    /// 清單失敗時不會寫出任何檔案。
    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting licitaciones ETL run");

        let listings = self.pipeline.extract().await?;
        self.monitor.log_phase("Extract");

        let enrichment = self.pipeline.enrich(&listings).await;
        self.monitor.log_phase("Enrich");

        let output_path = self.pipeline.load(listings, enrichment).await?;
        self.monitor.log_phase("Load");

        self.monitor.log_final_stats();
        Ok(output_path)
    }
}
