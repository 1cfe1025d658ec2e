//! 项目 Store：列表、当前项目、创建

use super::collection::CollectionState;
use super::thunk::{AsyncAction, Operation};
use super::{Action, Store};
use crate::api::ApiError;
use crate::services::{ProjectCreate, ProjectListParams, ProjectService};
use crate::types::{Paginated, Project};

pub type ProjectsState = CollectionState<Project>;

#[derive(Debug, Clone, PartialEq)]
pub enum ProjectsAction {
    FetchList(AsyncAction<Paginated<Project>>),
    FetchOne(AsyncAction<Project>),
    Create(AsyncAction<Project>),
    ClearError,
    ClearCurrent,
}

pub fn reduce(state: &mut ProjectsState, action: ProjectsAction) {
    match action {
        ProjectsAction::FetchList(a) => state.apply(a, CollectionState::replace_page),
        ProjectsAction::FetchOne(a) => state.apply(a, CollectionState::focus),
        ProjectsAction::Create(a) => state.apply(a, CollectionState::prepend),
        ProjectsAction::ClearError => state.clear_error(),
        ProjectsAction::ClearCurrent => state.clear_focused(),
    }
}

const FETCH_PROJECTS: Operation<Paginated<Project>> = Operation {
    name: "projects/fetchProjects",
    fallback: "Failed to fetch projects",
    wrap: |a| Action::Projects(ProjectsAction::FetchList(a)),
};

const FETCH_PROJECT: Operation<Project> = Operation {
    name: "projects/fetchProject",
    fallback: "Failed to fetch project",
    wrap: |a| Action::Projects(ProjectsAction::FetchOne(a)),
};

const CREATE_PROJECT: Operation<Project> = Operation {
    name: "projects/createProject",
    fallback: "Failed to create project",
    wrap: |a| Action::Projects(ProjectsAction::Create(a)),
};

/// 项目相关的可派发操作
#[derive(Clone)]
pub struct ProjectThunks {
    store: Store,
    service: ProjectService,
}

impl ProjectThunks {
    pub fn new(store: Store, service: ProjectService) -> Self {
        Self { store, service }
    }

    /// 拉取一页项目；并发的多次拉取以最后完成者为准
    pub async fn fetch_projects(&self, params: ProjectListParams) -> Result<Paginated<Project>, ApiError> {
        FETCH_PROJECTS
            .run(&self.store, async { self.service.list(&params).await })
            .await
    }

    pub async fn fetch_project(&self, id: &str) -> Result<Project, ApiError> {
        FETCH_PROJECT
            .run(&self.store, async { Ok(self.service.get(id).await?.data) })
            .await
    }

    /// 服务端确认后才插入 items 队首
    pub async fn create_project(&self, data: ProjectCreate) -> Result<Project, ApiError> {
        CREATE_PROJECT
            .run(&self.store, async { Ok(self.service.create(&data).await?.data) })
            .await
    }

    pub fn clear_error(&self) {
        self.store.dispatch(Action::Projects(ProjectsAction::ClearError));
    }

    pub fn clear_current_project(&self) {
        self.store.dispatch(Action::Projects(ProjectsAction::ClearCurrent));
    }
}
