//! AI 活动 Store：列表、单条详情、记录新活动

use super::collection::CollectionState;
use super::thunk::{AsyncAction, Operation};
use super::{Action, Store};
use crate::api::ApiError;
use crate::services::{AiActivityCreate, AiActivityListParams, AiActivityService};
use crate::types::{AiActivity, Paginated};

pub type AiActivitiesState = CollectionState<AiActivity>;

#[derive(Debug, Clone, PartialEq)]
pub enum AiActivitiesAction {
    FetchList(AsyncAction<Paginated<AiActivity>>),
    FetchOne(AsyncAction<AiActivity>),
    Log(AsyncAction<AiActivity>),
    ClearError,
}

pub fn reduce(state: &mut AiActivitiesState, action: AiActivitiesAction) {
    match action {
        AiActivitiesAction::FetchList(a) => state.apply(a, CollectionState::replace_page),
        AiActivitiesAction::FetchOne(a) => state.apply(a, CollectionState::focus),
        AiActivitiesAction::Log(a) => state.apply(a, CollectionState::prepend),
        AiActivitiesAction::ClearError => state.clear_error(),
    }
}

const FETCH_AI_ACTIVITIES: Operation<Paginated<AiActivity>> = Operation {
    name: "aiActivities/fetchAIActivities",
    fallback: "Failed to fetch AI activities",
    wrap: |a| Action::AiActivities(AiActivitiesAction::FetchList(a)),
};

const FETCH_AI_ACTIVITY: Operation<AiActivity> = Operation {
    name: "aiActivities/fetchAIActivity",
    fallback: "Failed to fetch AI activity",
    wrap: |a| Action::AiActivities(AiActivitiesAction::FetchOne(a)),
};

const LOG_AI_ACTIVITY: Operation<AiActivity> = Operation {
    name: "aiActivities/logAIActivity",
    fallback: "Failed to log AI activity",
    wrap: |a| Action::AiActivities(AiActivitiesAction::Log(a)),
};

#[derive(Clone)]
pub struct AiActivityThunks {
    store: Store,
    service: AiActivityService,
}

impl AiActivityThunks {
    pub fn new(store: Store, service: AiActivityService) -> Self {
        Self { store, service }
    }

    pub async fn fetch_ai_activities(
        &self,
        params: AiActivityListParams,
    ) -> Result<Paginated<AiActivity>, ApiError> {
        FETCH_AI_ACTIVITIES
            .run(&self.store, async { self.service.list(&params).await })
            .await
    }

    pub async fn fetch_ai_activity(&self, id: &str) -> Result<AiActivity, ApiError> {
        FETCH_AI_ACTIVITY
            .run(&self.store, async { Ok(self.service.get(id).await?.data) })
            .await
    }

    pub async fn log_ai_activity(&self, data: AiActivityCreate) -> Result<AiActivity, ApiError> {
        LOG_AI_ACTIVITY
            .run(&self.store, async { Ok(self.service.create(&data).await?.data) })
            .await
    }

    pub fn clear_error(&self) {
        self.store.dispatch(Action::AiActivities(AiActivitiesAction::ClearError));
    }
}
