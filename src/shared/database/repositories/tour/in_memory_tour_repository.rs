use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;
use crate::domains::tour::models::{NewTour, Tour, TourImage, TourInput};
use crate::shared::database::repositories::tour::{normalize_search, TourStore};

/// 인메모리 투어 저장소
#[derive(Default)]
pub struct InMemoryTourRepository {
    tours: RwLock<HashMap<Uuid, Tour>>,
}

impl InMemoryTourRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TourStore for InMemoryTourRepository {
    async fn create(&self, tour: NewTour) -> Result<Tour> {
        let now = Utc::now();
        let created = Tour {
            id: Uuid::new_v4(),
            name: tour.input.name,
            description: tour.input.description,
            location: tour.input.location,
            price: tour.input.price,
            duration: tour.input.duration,
            image_url: tour.image_url,
            image_public_id: tour.image_public_id,
            created_at: now,
            updated_at: now,
            user_id: tour.user_id,
        };
        self.tours.write().insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tour>> {
        Ok(self.tours.read().get(&id).cloned())
    }

    async fn list_by_owner(&self, user_id: Uuid, search: Option<&str>) -> Result<Vec<Tour>> {
        let search = normalize_search(search);
        let mut tours: Vec<Tour> = self
            .tours
            .read()
            .values()
            .filter(|t| t.user_id == user_id)
            .filter(|t| match &search {
                Some(s) => t.name.to_lowercase().contains(s) || t.location.to_lowercase().contains(s),
                None => true,
            })
            .cloned()
            .collect();
        tours.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tours)
    }

    async fn update(&self, id: Uuid, input: &TourInput) -> Result<Option<Tour>> {
        let mut tours = self.tours.write();
        Ok(tours.get_mut(&id).map(|tour| {
            tour.name = input.name.clone();
            tour.description = input.description.clone();
            tour.location = input.location.clone();
            tour.price = input.price;
            tour.duration = input.duration;
            tour.updated_at = Utc::now();
            tour.clone()
        }))
    }

    async fn set_image(&self, id: Uuid, image: &TourImage) -> Result<Option<Tour>> {
        let mut tours = self.tours.write();
        Ok(tours.get_mut(&id).map(|tour| {
            tour.image_url = image.image_url.clone();
            tour.image_public_id = image.image_public_id.clone();
            tour.updated_at = Utc::now();
            tour.clone()
        }))
    }
}
