//! End-to-end publish runs against an in-memory registry.

use async_trait::async_trait;
use restgen_publish::publisher::COLORS;
use restgen_publish::{
    LocalCatalog, PublishAction, PublishError, PublishState, Publisher, RemoteTool, ToolAction,
    ToolPayload, ToolRegistry,
};
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    List,
    Create(String, String),
    Update(String, String),
    Delete(String),
}

#[derive(Debug, Default)]
struct FakeRegistry {
    tools: Mutex<Vec<(RemoteTool, Option<ToolPayload>)>>,
    calls: Mutex<Vec<Call>>,
    next_id: Mutex<u32>,
    fail_list: bool,
    fail_create: Option<String>,
}

impl FakeRegistry {
    fn with_tools(names: &[(&str, &str)]) -> Self {
        let registry = Self::default();
        {
            let mut tools = registry.tools.lock().unwrap();
            for (id, name) in names {
                tools.push((
                    RemoteTool {
                        id: (*id).to_string(),
                        name: (*name).to_string(),
                    },
                    None,
                ));
            }
        }
        registry
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn names(&self) -> Vec<String> {
        self.tools
            .lock()
            .unwrap()
            .iter()
            .map(|(t, _)| t.name.clone())
            .collect()
    }

    fn payload(&self, name: &str) -> Option<ToolPayload> {
        self.tools
            .lock()
            .unwrap()
            .iter()
            .find(|(t, _)| t.name == name)
            .and_then(|(_, p)| p.clone())
    }
}

fn unavailable(method: &str) -> PublishError {
    PublishError::Status {
        method: method.to_string(),
        url: "http://registry/api/v1/tools".to_string(),
        status: 500,
        body: "Internal Server Error".to_string(),
    }
}

#[async_trait]
impl ToolRegistry for FakeRegistry {
    async fn list_tools(&self) -> restgen_publish::Result<Vec<RemoteTool>> {
        self.calls.lock().unwrap().push(Call::List);
        if self.fail_list {
            return Err(unavailable("GET"));
        }
        Ok(self
            .tools
            .lock()
            .unwrap()
            .iter()
            .map(|(t, _)| t.clone())
            .collect())
    }

    async fn create_tool(&self, payload: &ToolPayload) -> restgen_publish::Result<Option<String>> {
        if self.fail_create.as_deref() == Some(payload.name.as_str()) {
            return Err(unavailable("POST"));
        }
        let id = {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            format!("id-{next}")
        };
        self.calls
            .lock()
            .unwrap()
            .push(Call::Create(payload.name.clone(), payload.color.clone()));
        self.tools.lock().unwrap().push((
            RemoteTool {
                id: id.clone(),
                name: payload.name.clone(),
            },
            Some(payload.clone()),
        ));
        Ok(Some(id))
    }

    async fn update_tool(&self, id: &str, payload: &ToolPayload) -> restgen_publish::Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Update(id.to_string(), payload.name.clone()));
        let mut tools = self.tools.lock().unwrap();
        if let Some(entry) = tools.iter_mut().find(|(t, _)| t.id == id) {
            entry.1 = Some(payload.clone());
        }
        Ok(())
    }

    async fn delete_tool(&self, id: &str) -> restgen_publish::Result<()> {
        self.calls.lock().unwrap().push(Call::Delete(id.to_string()));
        self.tools.lock().unwrap().retain(|(t, _)| t.id != id);
        Ok(())
    }
}

fn write_tools(root: &Path, service: &str, tools: &[(&str, &str)]) {
    let dir = root.join(service);
    fs::create_dir_all(&dir).unwrap();
    let entries: Vec<_> = tools
        .iter()
        .map(|(name, _)| {
            serde_json::json!({
                "name": name,
                "description": format!("[Svc] GET /{name}"),
                "schema": [],
                "method": "GET",
                "path": format!("/{name}"),
                "operationId": null,
                "file": format!("{name}.js"),
            })
        })
        .collect();
    fs::write(
        dir.join("manifest.json"),
        serde_json::to_string_pretty(&entries).unwrap(),
    )
    .unwrap();
    for (name, body) in tools {
        fs::write(dir.join(format!("{name}.js")), body).unwrap();
    }
}

struct Fixture {
    temp: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            temp: TempDir::new().unwrap(),
        }
    }

    fn tools_dir(&self) -> std::path::PathBuf {
        self.temp.path().join("tools")
    }

    fn state_path(&self) -> std::path::PathBuf {
        self.temp.path().join("publish-state.json")
    }

    fn catalog(&self) -> LocalCatalog {
        LocalCatalog::scan(self.tools_dir()).unwrap()
    }
}

#[tokio::test]
async fn test_second_run_leaves_tools_unchanged() {
    let fx = Fixture::new();
    write_tools(
        &fx.tools_dir(),
        "svc",
        &[("Svc-A-GET-getA", "return 'a';"), ("Svc-B-GET-getB", "return 'b';")],
    );

    let publisher = Publisher::new(FakeRegistry::default(), fx.state_path());
    let report = publisher.publish(&fx.catalog()).await.unwrap();
    assert_eq!(report.created, 2);
    assert_eq!(report.unchanged, 0);
    assert!(report.is_clean());

    publisher.registry().clear_calls();
    let report = publisher.publish(&fx.catalog()).await.unwrap();
    assert_eq!(report.created, 0);
    assert_eq!(report.updated, 0);
    assert_eq!(report.unchanged, 2);
    assert_eq!(publisher.registry().calls(), vec![Call::List]);
}

#[tokio::test]
async fn test_changed_function_is_updated() {
    let fx = Fixture::new();
    write_tools(&fx.tools_dir(), "svc", &[("Svc-A-GET-getA", "return 'a';")]);

    let publisher = Publisher::new(FakeRegistry::default(), fx.state_path());
    publisher.publish(&fx.catalog()).await.unwrap();

    write_tools(&fx.tools_dir(), "svc", &[("Svc-A-GET-getA", "return 'changed';")]);
    publisher.registry().clear_calls();
    let report = publisher.publish(&fx.catalog()).await.unwrap();

    assert_eq!(report.updated, 1);
    assert_eq!(
        publisher.registry().calls(),
        vec![
            Call::List,
            Call::Update("id-1".to_string(), "Svc-A-GET-getA".to_string())
        ]
    );
    assert_eq!(
        publisher.registry().payload("Svc-A-GET-getA").unwrap().func,
        "return 'changed';"
    );

    let state = PublishState::load(fx.state_path()).unwrap();
    assert_eq!(state.published["Svc-A-GET-getA"].action, PublishAction::Updated);
}

#[tokio::test]
async fn test_existing_remote_tool_without_checkpoint_is_updated() {
    let fx = Fixture::new();
    write_tools(&fx.tools_dir(), "svc", &[("Svc-A-GET-getA", "return 'a';")]);

    let registry = FakeRegistry::with_tools(&[("r-1", "Svc-A-GET-getA")]);
    let publisher = Publisher::new(registry, fx.state_path());
    let report = publisher.publish(&fx.catalog()).await.unwrap();

    assert_eq!(report.created, 0);
    assert_eq!(report.updated, 1);
    let state = PublishState::load(fx.state_path()).unwrap();
    assert_eq!(state.published["Svc-A-GET-getA"].id, "r-1");
}

#[tokio::test]
async fn test_stale_generated_tools_are_deleted() {
    let fx = Fixture::new();
    write_tools(&fx.tools_dir(), "svc", &[("Svc-A-GET-getA", "return 'a';")]);

    let registry = FakeRegistry::with_tools(&[
        ("r-1", "Svc-Old-GET-getOld"),
        ("r-2", "get_workers"),
        ("r-3", "Hand-Made-GET-Retrieve_Requisitions"),
        ("r-4", "custom-tool"),
        ("r-5", "Svc-A-GET-getA"),
    ]);
    let publisher = Publisher::new(registry, fx.state_path())
        .with_keep_list(["Hand-Made-GET-Retrieve_Requisitions".to_string()]);

    let plan = publisher.plan(&fx.catalog()).await.unwrap();
    assert_eq!(plan.deletions.len(), 1);
    assert_eq!(plan.deletions[0].name, "Svc-Old-GET-getOld");
    assert_eq!(
        plan.actions,
        vec![(
            "Svc-A-GET-getA".to_string(),
            ToolAction::Update {
                id: "r-5".to_string()
            }
        )]
    );

    let report = publisher.publish(&fx.catalog()).await.unwrap();
    assert_eq!(report.deleted, 1);
    assert_eq!(
        publisher.registry().names(),
        [
            "get_workers",
            "Hand-Made-GET-Retrieve_Requisitions",
            "custom-tool",
            "Svc-A-GET-getA"
        ]
    );
}

#[tokio::test]
async fn test_plan_does_not_touch_registry_or_state() {
    let fx = Fixture::new();
    write_tools(&fx.tools_dir(), "svc", &[("Svc-A-GET-getA", "return 'a';")]);

    let registry = FakeRegistry::with_tools(&[("r-1", "Svc-Old-GET-getOld")]);
    let publisher = Publisher::new(registry, fx.state_path());
    let plan = publisher.plan(&fx.catalog()).await.unwrap();

    assert_eq!(plan.counts(), (1, 0, 0));
    assert_eq!(publisher.registry().calls(), vec![Call::List]);
    assert!(!fx.state_path().exists());
}

#[tokio::test]
async fn test_colors_cycle_through_palette() {
    let fx = Fixture::new();
    let names: Vec<String> = (0..10).map(|i| format!("Svc-R-GET-get{i:02}")).collect();
    let tools: Vec<(&str, &str)> = names.iter().map(|n| (n.as_str(), "return 1;")).collect();
    write_tools(&fx.tools_dir(), "svc", &tools);

    let publisher = Publisher::new(FakeRegistry::default(), fx.state_path());
    publisher.publish(&fx.catalog()).await.unwrap();

    let colors: Vec<String> = publisher
        .registry()
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            Call::Create(_, color) => Some(color),
            _ => None,
        })
        .collect();
    assert_eq!(colors.len(), 10);
    assert_eq!(colors[0], COLORS[0]);
    assert_eq!(colors[7], COLORS[7]);
    assert_eq!(colors[8], COLORS[0]);
    assert_eq!(colors[9], COLORS[1]);
}

#[tokio::test]
async fn test_failed_create_is_reported_and_run_continues() {
    let fx = Fixture::new();
    write_tools(
        &fx.tools_dir(),
        "svc",
        &[("Svc-A-GET-getA", "return 'a';"), ("Svc-B-GET-getB", "return 'b';")],
    );

    let registry = FakeRegistry {
        fail_create: Some("Svc-A-GET-getA".to_string()),
        ..FakeRegistry::default()
    };
    let publisher = Publisher::new(registry, fx.state_path());
    let report = publisher.publish(&fx.catalog()).await.unwrap();

    assert_eq!(report.created, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].name, "Svc-A-GET-getA");
    assert!(report.failures[0].message.contains("500"));
    assert!(!report.is_clean());

    let state = PublishState::load(fx.state_path()).unwrap();
    assert!(!state.published.contains_key("Svc-A-GET-getA"));
    assert!(state.published.contains_key("Svc-B-GET-getB"));
    assert!(state.last_run.is_some());
}

#[tokio::test]
async fn test_missing_function_files_are_skipped() {
    let fx = Fixture::new();
    write_tools(&fx.tools_dir(), "svc", &[("Svc-A-GET-getA", "return 'a';")]);
    fs::remove_file(fx.tools_dir().join("svc/Svc-A-GET-getA.js")).unwrap();

    let publisher = Publisher::new(FakeRegistry::default(), fx.state_path());
    let report = publisher.publish(&fx.catalog()).await.unwrap();
    assert_eq!(report.skipped, 1);
    assert_eq!(report.created, 0);
}

#[tokio::test]
async fn test_listing_failure_is_fatal() {
    let fx = Fixture::new();
    write_tools(&fx.tools_dir(), "svc", &[("Svc-A-GET-getA", "return 'a';")]);

    let registry = FakeRegistry {
        fail_list: true,
        ..FakeRegistry::default()
    };
    let publisher = Publisher::new(registry, fx.state_path());
    let err = publisher.publish(&fx.catalog()).await.unwrap_err();

    assert!(err.is_remote());
    assert_eq!(err.status(), Some(500));
    assert!(!fx.state_path().exists());
}
