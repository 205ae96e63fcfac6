//! In-memory backend for store flow tests.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use pass_core::{
    BackendError, GpgKey, PassBackendPort, SecretString, SetupStatus, StoreInfo, TreeNode,
};
use tokio::sync::oneshot;

type Reply = Result<String, BackendError>;

/// Fake backend holding a mutable tree and scripted wizard responses.
///
/// Every call is appended to `calls` so tests can assert on ordering.
#[derive(Default)]
pub struct FakeBackend {
    pub tree: Mutex<Vec<TreeNode>>,
    pub calls: Mutex<Vec<String>>,
    pub fail: Mutex<HashMap<&'static str, BackendError>>,
    show_gates: Mutex<HashMap<String, oneshot::Receiver<Reply>>>,
    list_gates: Mutex<VecDeque<oneshot::Receiver<Result<Vec<TreeNode>, BackendError>>>>,

    pub status: Mutex<SetupStatus>,
    pub store_info: Mutex<StoreInfo>,
    pub keys: Mutex<Vec<GpgKey>>,
}

impl FakeBackend {
    pub fn with_tree(tree: Vec<TreeNode>) -> Self {
        let backend = Self::default();
        *backend.tree.lock().unwrap() = tree;
        backend
    }

    /// Make `operation` fail with `error` until cleared.
    pub fn fail_on(&self, operation: &'static str, error: BackendError) {
        self.fail.lock().unwrap().insert(operation, error);
    }

    pub fn clear_failure(&self, operation: &'static str) {
        self.fail.lock().unwrap().remove(operation);
    }

    /// Hold the next `show_entry(path)` until the returned sender fires.
    pub fn gate_show(&self, path: &str) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.show_gates.lock().unwrap().insert(path.to_string(), rx);
        tx
    }

    /// Hold the next `list_tree` call until the returned sender fires.
    /// Gates are consumed in call order.
    pub fn gate_list(&self) -> oneshot::Sender<Result<Vec<TreeNode>, BackendError>> {
        let (tx, rx) = oneshot::channel();
        self.list_gates.lock().unwrap().push_back(rx);
        tx
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.split(' ').next() == Some(operation))
            .count()
    }

    fn record(&self, operation: &'static str, detail: &str) -> Result<(), BackendError> {
        let call = if detail.is_empty() {
            operation.to_string()
        } else {
            format!("{operation} {detail}")
        };
        self.calls.lock().unwrap().push(call);
        match self.fail.lock().unwrap().get(operation) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn prune(&self, path: &str) {
        fn prune_nodes(nodes: &mut Vec<TreeNode>, path: &str) {
            nodes.retain(|node| node.path != path);
            for node in nodes.iter_mut() {
                prune_nodes(&mut node.children, path);
            }
        }
        prune_nodes(&mut self.tree.lock().unwrap(), path);
    }
}

#[async_trait]
impl PassBackendPort for FakeBackend {
    async fn list_tree(&self) -> Result<Vec<TreeNode>, BackendError> {
        self.record("list_tree", "")?;
        let gate = self.list_gates.lock().unwrap().pop_front();
        match gate {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(BackendError::from("gate dropped"))),
            None => Ok(self.tree.lock().unwrap().clone()),
        }
    }

    async fn show_entry(&self, path: &str) -> Result<String, BackendError> {
        self.record("show_entry", path)?;
        let gate = self.show_gates.lock().unwrap().remove(path);
        match gate {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(BackendError::from("gate dropped"))),
            None => Ok(format!("secret for {path}")),
        }
    }

    async fn remove_entry(&self, path: &str) -> Result<(), BackendError> {
        self.record("remove_entry", path)?;
        self.prune(path);
        Ok(())
    }

    async fn remove_batch(&self, paths: &[String]) -> Result<(), BackendError> {
        self.record("remove_batch", &paths.join(","))?;
        for path in paths {
            self.prune(path);
        }
        Ok(())
    }

    async fn insert_entry(
        &self,
        path: &str,
        _content: &SecretString,
    ) -> Result<String, BackendError> {
        self.record("insert_entry", path)?;
        self.tree.lock().unwrap().push(TreeNode::leaf(path, path));
        Ok(String::new())
    }

    async fn generate_entry(
        &self,
        path: &str,
        length: u32,
        _no_symbols: bool,
    ) -> Result<String, BackendError> {
        self.record("generate_entry", path)?;
        self.tree.lock().unwrap().push(TreeNode::leaf(path, path));
        Ok("x".repeat(length as usize))
    }

    async fn move_entry(&self, from: &str, to: &str) -> Result<String, BackendError> {
        self.record("move_entry", &format!("{from}->{to}"))?;
        self.prune(from);
        self.tree.lock().unwrap().push(TreeNode::leaf(to, to));
        Ok(String::new())
    }

    async fn copy_entry(&self, from: &str, to: &str) -> Result<String, BackendError> {
        self.record("copy_entry", &format!("{from}->{to}"))?;
        self.tree.lock().unwrap().push(TreeNode::leaf(to, to));
        Ok(String::new())
    }

    async fn check_setup_status(&self) -> Result<SetupStatus, BackendError> {
        self.record("check_setup_status", "")?;
        Ok(self.status.lock().unwrap().clone())
    }

    async fn get_store_info(&self) -> Result<StoreInfo, BackendError> {
        self.record("get_store_info", "")?;
        Ok(self.store_info.lock().unwrap().clone())
    }

    async fn install_dependencies(&self) -> Result<SetupStatus, BackendError> {
        self.record("install_dependencies", "")?;
        let mut status = self.status.lock().unwrap();
        status.dependencies_ok = true;
        for dep in &mut status.dependencies {
            dep.installed = true;
        }
        Ok(status.clone())
    }

    async fn list_gpg_keys(&self) -> Result<Vec<GpgKey>, BackendError> {
        self.record("list_gpg_keys", "")?;
        Ok(self.keys.lock().unwrap().clone())
    }

    async fn generate_gpg_key(
        &self,
        name: &str,
        email: &str,
        _passphrase: &SecretString,
    ) -> Result<GpgKey, BackendError> {
        self.record("generate_gpg_key", email)?;
        let key = GpgKey {
            key_id: "GENERATED01".to_string(),
            uid: format!("{name} <{email}>"),
            fingerprint: "0123456789ABCDEFGENERATED01".to_string(),
        };
        self.keys.lock().unwrap().push(key.clone());
        Ok(key)
    }

    async fn init_store(&self, gpg_id: &str) -> Result<String, BackendError> {
        self.record("init_store", gpg_id)?;
        let mut info = self.store_info.lock().unwrap();
        info.gpg_id = Some(gpg_id.to_string());
        Ok(format!("Password store initialized for {gpg_id}"))
    }

    async fn init_git_repo(&self) -> Result<String, BackendError> {
        self.record("init_git_repo", "")?;
        self.store_info.lock().unwrap().has_git = true;
        Ok("Initialized empty Git repository".to_string())
    }

    async fn add_git_remote(&self, url: &str) -> Result<String, BackendError> {
        self.record("add_git_remote", url)?;
        self.store_info.lock().unwrap().git_remote = Some(url.to_string());
        Ok(String::new())
    }

    async fn mark_setup_complete(&self) -> Result<(), BackendError> {
        self.record("mark_setup_complete", "")
    }

    async fn git_push(&self) -> Result<String, BackendError> {
        self.record("git_push", "")?;
        Ok(String::new())
    }

    async fn git_pull(&self) -> Result<String, BackendError> {
        self.record("git_pull", "")?;
        Ok(String::new())
    }

    async fn git_log(&self, limit: u32) -> Result<String, BackendError> {
        self.record("git_log", &limit.to_string())?;
        Ok(String::new())
    }
}

pub fn sample_tree() -> Vec<TreeNode> {
    vec![
        TreeNode::leaf("email", "email"),
        TreeNode::dir(
            "work",
            "work",
            vec![
                TreeNode::leaf("aws", "work/aws"),
                TreeNode::leaf("vpn", "work/vpn"),
            ],
        ),
    ]
}
