//! Catalog acquisition with all-or-nothing fallback

use crate::config::{CatalogConfig, GroupConfig};
use crate::tle::fallback::{DEBRIS_GROUP, debris_sets, fallback_sets};
use crate::tle::fetcher::{CelestrakGroup, GroupSource};
use crate::tle::parser::parse_catalog_text;
use crate::tle::types::{Catalog, CatalogSource, Classification, OrbitalElementSet};
use anyhow::{Context, Result, bail};
use futures::future::try_join_all;
use tracing::{debug, info, warn};

pub struct CatalogLoader<S> {
    source: S,
    config: CatalogConfig,
}

impl<S: GroupSource> CatalogLoader<S> {
    pub fn new(source: S, config: CatalogConfig) -> Self {
        Self { source, config }
    }

    /// Build the working catalog. Never fails: any problem with the live
    /// groups swaps in the embedded snapshot as a whole.
    pub async fn load(&self) -> Catalog {
        if self.config.offline {
            return self.fallback("offline mode");
        }

        match self.acquire_live().await {
            Ok(mut sets) if !sets.is_empty() => {
                sets.extend(debris_sets(DEBRIS_GROUP));
                let catalog = Catalog::new(CatalogSource::Live, sets);
                info!(
                    "[CATALOG] live catalog loaded: {} objects ({} stations, {} debris, {} active)",
                    catalog.len(),
                    catalog.count_by(Classification::Station),
                    catalog.count_by(Classification::Debris),
                    catalog.count_by(Classification::Active),
                );
                catalog
            }
            Ok(_) => self.fallback("live groups yielded no element sets"),
            Err(e) => self.fallback(&format!("{e:#}")),
        }
    }

    async fn acquire_live(&self) -> Result<Vec<OrbitalElementSet>> {
        let requests = self
            .config
            .groups
            .iter()
            .map(|group| self.acquire_group(group));
        let groups = try_join_all(requests).await?;
        Ok(groups.into_iter().flatten().collect())
    }

    async fn acquire_group(&self, group: &GroupConfig) -> Result<Vec<OrbitalElementSet>> {
        if CelestrakGroup::from_query_name(&group.name).is_none() {
            debug!("[CATALOG] group={} is not a known CelesTrak group", group.name);
        }
        let body = tokio::time::timeout(
            self.config.request_timeout(),
            self.source.fetch_group(&group.name),
        )
        .await
        .with_context(|| format!("group {} timed out", group.name))?
        .with_context(|| format!("group {} request failed", group.name))?;

        let mut sets = parse_catalog_text(&body, group.classification, &group.name);
        if sets.is_empty() {
            bail!("group {} had no parseable element sets", group.name);
        }
        if let Some(limit) = group.limit {
            sets.truncate(limit);
        }
        info!("[CATALOG] group={} parsed {} sets", group.name, sets.len());
        Ok(sets)
    }

    fn fallback(&self, reason: &str) -> Catalog {
        warn!("[CATALOG] using embedded snapshot: {}", reason);
        let catalog = Catalog::new(
            CatalogSource::Fallback,
            fallback_sets(self.config.synthetic_active),
        );
        info!("[CATALOG] fallback catalog loaded: {} objects", catalog.len());
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tle::fallback::FALLBACK_GROUP;
    use anyhow::anyhow;
    use std::collections::HashMap;
    use std::time::Duration;

    const STATIONS: &str = "ISS (ZARYA)
1 25544U 98067A   24226.56250000  .00007211  00000-0  13379-3 0  9991
2 25544  51.6422 266.4643 0007888 121.4429 238.6624 15.49494792423450
";
    const SCIENCE: &str = "HST
1 20580U 90037B   24226.50000000  .00001000  00000-0  50000-4 0  9995
2 20580  28.4700 100.0000 0002500  90.0000 270.0000 15.15000000500001
";

    struct FakeSource {
        bodies: HashMap<&'static str, Result<&'static str, &'static str>>,
    }

    impl FakeSource {
        fn new(entries: &[(&'static str, Result<&'static str, &'static str>)]) -> Self {
            Self {
                bodies: entries.iter().cloned().collect(),
            }
        }
    }

    impl GroupSource for FakeSource {
        async fn fetch_group(&self, group: &str) -> Result<String> {
            match self.bodies.get(group) {
                Some(Ok(body)) => Ok(body.to_string()),
                Some(Err(e)) => Err(anyhow!("{e}")),
                None => Err(anyhow!("unknown group {group}")),
            }
        }
    }

    struct StalledSource;

    impl GroupSource for StalledSource {
        async fn fetch_group(&self, _group: &str) -> Result<String> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(STATIONS.to_string())
        }
    }

    fn config(groups: &[(&str, Classification)]) -> CatalogConfig {
        CatalogConfig {
            groups: groups
                .iter()
                .map(|(name, c)| GroupConfig::new(*name, *c, None))
                .collect(),
            synthetic_active: 6,
            ..CatalogConfig::default()
        }
    }

    fn names(catalog: &Catalog) -> Vec<String> {
        catalog.iter().map(|s| s.name.clone()).collect()
    }

    fn fallback_names() -> Vec<String> {
        fallback_sets(6).into_iter().map(|s| s.name).collect()
    }

    #[tokio::test]
    async fn test_live_catalog_is_union_plus_debris() {
        let source = FakeSource::new(&[("stations", Ok(STATIONS)), ("science", Ok(SCIENCE))]);
        let loader = CatalogLoader::new(
            source,
            config(&[
                ("stations", Classification::Station),
                ("science", Classification::Active),
            ]),
        );
        let catalog = loader.load().await;

        assert_eq!(catalog.source, CatalogSource::Live);
        assert_eq!(catalog.count_by(Classification::Station), 1);
        assert_eq!(catalog.count_by(Classification::Active), 1);
        assert_eq!(catalog.count_by(Classification::Debris), 3);
        assert_eq!(catalog.find("ISS (ZARYA)").unwrap().group, "stations");
        assert_eq!(catalog.find("HST").unwrap().group, "science");
        assert!(
            catalog
                .iter()
                .filter(|s| s.classification == Classification::Debris)
                .all(|s| s.group == DEBRIS_GROUP)
        );
        assert!(catalog.iter().all(|s| s.group != FALLBACK_GROUP));
    }

    #[tokio::test]
    async fn test_one_failed_group_falls_back_wholesale() {
        let source = FakeSource::new(&[("stations", Ok(STATIONS)), ("science", Err("503"))]);
        let loader = CatalogLoader::new(
            source,
            config(&[
                ("stations", Classification::Station),
                ("science", Classification::Active),
            ]),
        );
        let catalog = loader.load().await;

        assert_eq!(catalog.source, CatalogSource::Fallback);
        assert_eq!(names(&catalog), fallback_names());
        assert!(catalog.iter().all(|s| s.group == FALLBACK_GROUP));
    }

    #[tokio::test]
    async fn test_unparseable_group_falls_back() {
        let source = FakeSource::new(&[("stations", Ok("garbage\nmore garbage\n"))]);
        let loader = CatalogLoader::new(source, config(&[("stations", Classification::Station)]));
        let catalog = loader.load().await;
        assert_eq!(catalog.source, CatalogSource::Fallback);
        assert_eq!(names(&catalog), fallback_names());
    }

    #[tokio::test]
    async fn test_no_groups_falls_back() {
        let loader = CatalogLoader::new(FakeSource::new(&[]), config(&[]));
        let catalog = loader.load().await;
        assert_eq!(catalog.source, CatalogSource::Fallback);
    }

    #[tokio::test]
    async fn test_offline_skips_source() {
        let source = FakeSource::new(&[("stations", Ok(STATIONS))]);
        let mut cfg = config(&[("stations", Classification::Station)]);
        cfg.offline = true;
        let catalog = CatalogLoader::new(source, cfg).load().await;
        assert_eq!(catalog.source, CatalogSource::Fallback);
        assert_eq!(names(&catalog), fallback_names());
    }

    #[tokio::test]
    async fn test_group_limit_truncates() {
        let two = format!("{STATIONS}{}", STATIONS.replace("ISS (ZARYA)", "ISS COPY"));
        let body: &'static str = Box::leak(two.into_boxed_str());
        let source = FakeSource::new(&[("stations", Ok(body))]);
        let mut cfg = config(&[("stations", Classification::Station)]);
        cfg.groups[0].limit = Some(1);
        let catalog = CatalogLoader::new(source, cfg).load().await;
        assert_eq!(catalog.count_by(Classification::Station), 1);
        assert!(catalog.find("ISS COPY").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_falls_back() {
        let mut cfg = config(&[("stations", Classification::Station)]);
        cfg.request_timeout_secs = 2;
        let catalog = CatalogLoader::new(StalledSource, cfg).load().await;
        assert_eq!(catalog.source, CatalogSource::Fallback);
    }
}
