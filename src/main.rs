//! Forge 控制台命令行
//!
//! 入口：加载配置、初始化日志、组装控制台并恢复会话，执行一条命令后把状态树以单个 JSON 文档打印到 stdout。

use anyhow::Context;
use forge_console::config::load_config;
use forge_console::services::{AiActivityListParams, LoginRequest, ProjectListParams, UsageParams};
use forge_console::{observability, Console, RootState};
use serde_json::Value;

const USAGE: &str = "usage: forge <login <email> <password> | logout | projects [page] | project <id> | activities [page] | usage | status>";

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    observability::init();

    let cfg = load_config(None).unwrap_or_else(|e| {
        tracing::warn!("Failed to load config ({}), using defaults", e);
        Default::default()
    });
    let console = Console::from_config(&cfg);
    console.session.check_session();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let outcome = run(&console, &args).await;

    let analytics = outcome.as_ref().ok().cloned().flatten();
    println!("{}", serde_json::to_string_pretty(&render(&console.state(), analytics))?);
    outcome.map(|_| ())
}

/// 执行一条命令；usage 返回统计数据，与状态树合并成同一个 JSON 文档输出
async fn run(console: &Console, args: &[String]) -> anyhow::Result<Option<Value>> {
    let per_page = Some(console.per_page());
    match args.first().map(String::as_str) {
        Some("login") => {
            let (Some(email), Some(password)) = (args.get(1), args.get(2)) else {
                anyhow::bail!(USAGE);
            };
            console
                .session
                .login(LoginRequest::new(email.as_str(), password.as_str()))
                .await
                .context("Login failed")?;
        }
        Some("logout") => console.session.logout(),
        Some("projects") => {
            let params = ProjectListParams {
                page: Some(page_arg(args.get(1))?),
                per_page,
                ..Default::default()
            };
            console
                .projects
                .fetch_projects(params)
                .await
                .context("Failed to fetch projects")?;
        }
        Some("project") => {
            let id = args.get(1).context(USAGE)?;
            console
                .projects
                .fetch_project(id)
                .await
                .context("Failed to fetch project")?;
        }
        Some("activities") => {
            let params = AiActivityListParams {
                page: Some(page_arg(args.get(1))?),
                per_page,
                ..Default::default()
            };
            console
                .ai_activities
                .fetch_ai_activities(params)
                .await
                .context("Failed to fetch AI activities")?;
        }
        Some("usage") => {
            let usage = console
                .services
                .analytics
                .usage(&UsageParams::default())
                .await
                .context("Failed to fetch usage analytics")?;
            return Ok(Some(serde_json::to_value(usage.data)?));
        }
        Some("status") | None => {}
        Some(other) => anyhow::bail!("unknown command '{}'\n{}", other, USAGE),
    }
    Ok(None)
}

fn page_arg(arg: Option<&String>) -> anyhow::Result<u32> {
    match arg {
        Some(s) => s.parse().with_context(|| format!("invalid page '{}'", s)),
        None => Ok(1),
    }
}

/// 输出文档：去掉令牌的状态树，usage 命令的统计数据挂在 `usage` 键下
fn render(state: &RootState, usage: Option<Value>) -> Value {
    let mut value = serde_json::to_value(state).unwrap_or(Value::Null);
    if let Some(auth) = value.get_mut("auth").and_then(Value::as_object_mut) {
        auth.remove("access_token");
        auth.remove("refresh_token");
    }
    if let (Some(usage), Some(root)) = (usage, value.as_object_mut()) {
        root.insert("usage".to_string(), usage);
    }
    value
}
