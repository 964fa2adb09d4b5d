// Tour domain state
// 투어 도메인 상태
use std::sync::Arc;
use crate::shared::clients::MediaHost;
use crate::shared::database::TourStore;
use crate::domains::tour::services::TourService;

/// Tour domain state
#[derive(Clone)]
pub struct TourState {
    pub tour_service: TourService,
}

impl TourState {
    pub fn new(tours: Arc<dyn TourStore>, media: Arc<dyn MediaHost>) -> Self {
        Self {
            tour_service: TourService::new(tours, media),
        }
    }
}
