//! Embedded `PostgreSQL` cluster shared by the store tests.
//!
//! Unprivileged runs start the server in-process. Under root the server is
//! driven through the `pg_worker` helper shipped with `pg-embed-setup-unpriv`,
//! found via `PG_EMBEDDED_WORKER` or on `PATH`.

use std::net::TcpListener;
use std::path::Path;
use std::sync::{Mutex, OnceLock, PoisonError};
use std::time::Duration;

use cap_std::{ambient_authority, fs::Dir};
use diesel::prelude::*;
use pg_embedded_setup_unpriv::worker_process_test_api::{
    WorkerOperation, WorkerRequest, WorkerRequestArgs, run as run_worker,
};
use pg_embedded_setup_unpriv::{
    ExecutionPrivileges, TestBootstrapSettings, bootstrap_for_tests, detect_execution_privileges,
};
use postgresql_embedded::{PostgreSQL, Settings, Status};
use rstest::fixture;
use tokio::runtime::Runtime;

use crate::test_helpers::env::scoped_env;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Handle to the process-wide cluster.
pub type SharedCluster = &'static EmbeddedCluster;

static CLUSTER: OnceLock<EmbeddedCluster> = OnceLock::new();
static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn boxed(err: impl std::error::Error + Send + Sync + 'static) -> BoxError {
    Box::new(err)
}

/// A running embedded server plus what is needed to keep it alive.
pub struct EmbeddedCluster {
    bootstrap: TestBootstrapSettings,
    env_vars: Vec<(String, Option<String>)>,
    #[expect(dead_code, reason = "keeps the in-process server and its runtime alive")]
    server: Option<(Runtime, PostgreSQL)>,
}

impl EmbeddedCluster {
    fn boot() -> Result<Self, BoxError> {
        let port = free_port()?;
        let worker = worker_override()?;
        let bootstrap = {
            let _env = scoped_env(&[
                ("PG_PORT", Some(port.as_str())),
                ("PG_EMBEDDED_WORKER", worker.as_deref()),
            ]);
            bootstrap_for_tests().map_err(boxed)?
        };

        let env_vars = bootstrap.environment.to_env();
        let mut cluster = Self {
            bootstrap,
            env_vars,
            server: None,
        };
        read_password_file(&mut cluster.bootstrap.settings)?;
        match cluster.bootstrap.privileges {
            ExecutionPrivileges::Root => cluster.start_with_worker()?,
            ExecutionPrivileges::Unprivileged => cluster.start_in_process()?,
        }
        read_port_from_pid_file(&mut cluster.bootstrap.settings)?;
        Ok(cluster)
    }

    fn start_in_process(&mut self) -> Result<(), BoxError> {
        let runtime = test_runtime()?;
        let overrides: Vec<(&str, Option<&str>)> = self
            .env_vars
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_deref()))
            .collect();
        let _env = scoped_env(&overrides);

        let mut postgres = PostgreSQL::new(self.bootstrap.settings.clone());
        runtime.block_on(async {
            postgres.setup().await.map_err(boxed)?;
            if !matches!(postgres.status(), Status::Started) {
                postgres.start().await.map_err(boxed)?;
            }
            Ok::<(), BoxError>(())
        })?;

        self.bootstrap.settings = postgres.settings().clone();
        self.server = Some((runtime, postgres));
        Ok(())
    }

    fn start_with_worker(&self) -> Result<(), BoxError> {
        self.worker(WorkerOperation::Setup, self.bootstrap.setup_timeout)?;
        self.worker(WorkerOperation::Start, self.bootstrap.start_timeout)
    }

    fn worker(&self, operation: WorkerOperation, timeout: Duration) -> Result<(), BoxError> {
        let worker = self.bootstrap.worker_binary.as_ref().ok_or_else(|| {
            boxed(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "running as root needs PG_EMBEDDED_WORKER or pg_worker on PATH",
            ))
        })?;
        let args = WorkerRequestArgs {
            worker: worker.as_path(),
            settings: &self.bootstrap.settings,
            env_vars: &self.env_vars,
            operation,
            timeout,
        };
        run_worker(&WorkerRequest::new(args)).map_err(boxed)
    }

    /// Returns the URL of `database` on this cluster.
    pub fn database_url(&self, database: &str) -> String {
        self.bootstrap.settings.url(database)
    }

    /// Creates `template` and runs `migrate` against it unless it already
    /// exists.
    ///
    /// A template whose migration fails is dropped again.
    pub fn ensure_template<F>(&self, template: &str, migrate: F) -> Result<(), BoxError>
    where
        F: FnOnce(&str) -> Result<(), BoxError>,
    {
        let _guard = TEMPLATE_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if self.database_exists(template)? {
            return Ok(());
        }
        self.admin(&format!("CREATE DATABASE {}", quoted(template)))?;
        if let Err(err) = migrate(&self.database_url(template)) {
            self.drop_database(template)?;
            return Err(err);
        }
        Ok(())
    }

    /// Creates `name` as a copy of `template`.
    pub fn clone_database(&self, name: &str, template: &str) -> Result<(), BoxError> {
        self.admin(&format!(
            "CREATE DATABASE {} TEMPLATE {}",
            quoted(name),
            quoted(template)
        ))
    }

    /// Drops `name`, closing any connections still open on it.
    pub fn drop_database(&self, name: &str) -> Result<(), BoxError> {
        self.admin(&format!("DROP DATABASE IF EXISTS {} WITH (FORCE)", quoted(name)))
    }

    fn admin(&self, sql: &str) -> Result<(), BoxError> {
        let mut connection =
            PgConnection::establish(&self.database_url("postgres")).map_err(boxed)?;
        diesel::sql_query(sql).execute(&mut connection).map_err(boxed)?;
        Ok(())
    }

    fn database_exists(&self, name: &str) -> Result<bool, BoxError> {
        #[derive(QueryableByName)]
        struct Exists {
            #[diesel(sql_type = diesel::sql_types::Bool)]
            exists: bool,
        }

        let mut connection =
            PgConnection::establish(&self.database_url("postgres")).map_err(boxed)?;
        let row = diesel::sql_query(
            "SELECT EXISTS (SELECT 1 FROM pg_database WHERE datname = $1) AS exists",
        )
        .bind::<diesel::sql_types::Text, _>(name)
        .get_result::<Exists>(&mut connection)
        .map_err(boxed)?;
        Ok(row.exists)
    }
}

/// The shared cluster, booted on first use.
///
/// # Panics
///
/// Panics when no server can be started.
#[fixture]
pub fn cluster() -> SharedCluster {
    CLUSTER.get_or_init(|| match EmbeddedCluster::boot() {
        Ok(cluster) => cluster,
        Err(err) => panic!("SKIP-TEST-CLUSTER: failed to start PostgreSQL: {err}"),
    })
}

/// Builds a single-threaded runtime for driving async code from sync tests.
pub fn test_runtime() -> Result<Runtime, BoxError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(boxed)
}

fn quoted(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

/// Picks a free port unless `PG_PORT` is already set.
fn free_port() -> Result<String, BoxError> {
    if let Ok(port) = std::env::var("PG_PORT") {
        return Ok(port);
    }
    let listener = TcpListener::bind(("127.0.0.1", 0)).map_err(boxed)?;
    let port = listener.local_addr().map_err(boxed)?.port();
    Ok(port.to_string())
}

/// Resolves the worker binary when running as root.
fn worker_override() -> Result<Option<String>, BoxError> {
    if let Ok(worker) = std::env::var("PG_EMBEDDED_WORKER") {
        return Ok(Some(worker));
    }
    if !matches!(detect_execution_privileges(), ExecutionPrivileges::Root) {
        return Ok(None);
    }
    let path = std::env::var_os("PATH").unwrap_or_default();
    let found = std::env::split_paths(&path)
        .map(|dir| dir.join("pg_worker"))
        .find(|candidate| candidate.is_file());
    Ok(found.and_then(|candidate| candidate.to_str().map(str::to_owned)))
}

fn open_dir(path: &Path) -> Result<Dir, BoxError> {
    Dir::open_ambient_dir(path, ambient_authority()).map_err(boxed)
}

/// Reads a file if it exists, treating absence as `None`.
fn read_optional(path: &Path) -> Result<Option<String>, BoxError> {
    let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
        return Ok(None);
    };
    match open_dir(parent)?.read_to_string(name) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(boxed(err)),
    }
}

/// Adopts the password the bootstrap wrote to disk, if any.
fn read_password_file(settings: &mut Settings) -> Result<(), BoxError> {
    if let Some(contents) = read_optional(&settings.password_file)? {
        let password = contents.trim_end();
        if !password.is_empty() {
            password.clone_into(&mut settings.password);
        }
    }
    Ok(())
}

/// Adopts the port the server actually bound, read from `postmaster.pid`.
fn read_port_from_pid_file(settings: &mut Settings) -> Result<(), BoxError> {
    let pid_file = settings.data_dir.join("postmaster.pid");
    let Some(contents) = read_optional(&pid_file)? else {
        return Ok(());
    };
    if let Some(port) = contents
        .lines()
        .nth(3)
        .and_then(|line| line.trim().parse::<u16>().ok())
    {
        settings.port = port;
    }
    Ok(())
}
