//! Recruit posts

use std::sync::Arc;

use crate::errors::{ModoosError, Result};
use crate::storage::{Category, NewStudy, Pageable, SeaOrmStorage, Slice, Study, StudyFilter};

pub const MAX_TITLE_LEN: usize = 100;
pub const MAX_TOTAL_PARTICIPANTS: i32 = 100;

#[derive(Debug, Clone)]
pub struct CreateRecruit {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub total_participants: i32,
}

pub struct StudyService {
    storage: Arc<SeaOrmStorage>,
}

impl StudyService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    pub async fn get_slice_of_recruit(
        &self,
        member_id: Option<i64>,
        filter: &StudyFilter,
        pageable: &Pageable,
    ) -> Result<Slice<(Study, bool)>> {
        self.storage
            .get_slice_of_recruit(member_id, filter, pageable)
            .await
    }

    pub async fn find_max_recruit_idx(&self) -> Result<Option<Study>> {
        self.storage.find_max_recruit_idx().await
    }

    pub async fn create_recruit(&self, writer_id: i64, req: CreateRecruit) -> Result<Study> {
        let title = req.title.trim();
        if title.is_empty() || title.chars().count() > MAX_TITLE_LEN {
            return Err(ModoosError::validation(format!(
                "Title must be 1-{} characters",
                MAX_TITLE_LEN
            )));
        }
        if !(2..=MAX_TOTAL_PARTICIPANTS).contains(&req.total_participants) {
            return Err(ModoosError::validation(format!(
                "totalParticipants must be between 2 and {}",
                MAX_TOTAL_PARTICIPANTS
            )));
        }

        self.storage
            .insert_study(NewStudy {
                title: title.to_string(),
                description: req.description,
                category: req.category,
                writer_id,
                total_participants: req.total_participants,
            })
            .await
    }
}
