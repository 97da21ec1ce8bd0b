//! Read-only view of the jurisdiction tree and seat catalog

use tracing::instrument;

use kpn_core::{Level, Snowflake, Tier};

use crate::dto::{JurisdictionDetailResponse, JurisdictionResponse, SeatResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Catalog service
pub struct CatalogService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CatalogService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// All jurisdictions in breadth-first order, optionally one level only
    #[instrument(skip(self))]
    pub fn jurisdictions(&self, level: Option<Level>) -> ServiceResult<Vec<JurisdictionResponse>> {
        let tree = &self.ctx.catalog().tree;
        let nodes = match level {
            Some(level) => tree.at_level(level),
            None => {
                let root = tree.root();
                let mut nodes = vec![root];
                nodes.extend(tree.descendants(root.id)?);
                nodes
            }
        };
        Ok(nodes.into_iter().map(JurisdictionResponse::from).collect())
    }

    /// One jurisdiction with its ancestors (root first) and direct children
    #[instrument(skip(self))]
    pub fn jurisdiction(&self, id: Snowflake) -> ServiceResult<JurisdictionDetailResponse> {
        let tree = &self.ctx.catalog().tree;
        let node = tree.get(id)?;
        Ok(JurisdictionDetailResponse {
            jurisdiction: JurisdictionResponse::from(node),
            ancestors: tree.ancestors(id)?.into_iter().map(JurisdictionResponse::from).collect(),
            children: tree.children(id)?.into_iter().map(JurisdictionResponse::from).collect(),
        })
    }

    #[instrument(skip(self))]
    pub fn seats(&self, tier: Option<Tier>) -> Vec<SeatResponse> {
        let seats = &self.ctx.catalog().seats;
        let selected = match tier {
            Some(tier) => seats.seats_at(tier),
            None => seats.all(),
        };
        selected.into_iter().map(SeatResponse::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::Harness;

    #[test]
    fn test_listing_covers_whole_tree() {
        let h = Harness::new();
        let service = CatalogService::new(&h.ctx);
        let all = service.jurisdictions(None).unwrap();
        assert_eq!(all.len(), h.ctx.catalog().tree.len());
        assert_eq!(all[0].level, Level::State);
        assert!(service
            .jurisdictions(Some(Level::Zone))
            .unwrap()
            .iter()
            .all(|j| j.level == Level::Zone));
    }

    #[test]
    fn test_ward_detail_lists_ancestors_root_first() {
        let h = Harness::new();
        let ward = h.first_child(h.first_child(h.zone(0)));
        let detail = CatalogService::new(&h.ctx).jurisdiction(ward).unwrap();
        let levels: Vec<Level> = detail.ancestors.iter().map(|j| j.level).collect();
        assert_eq!(levels, vec![Level::State, Level::Zone, Level::Lga]);
        assert!(detail.children.is_empty());
    }

    #[test]
    fn test_seats_by_tier() {
        let h = Harness::new();
        let service = CatalogService::new(&h.ctx);
        let zonal = service.seats(Some(Tier::Zonal));
        assert_eq!(zonal.len(), 3);
        assert!(zonal[0].coordinator);
        assert!(service.seats(None).len() > zonal.len());
    }
}
