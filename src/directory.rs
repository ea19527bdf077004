//! User and role lookups backing the auth routes.

use async_trait::async_trait;
use serde::Deserialize;
use surrealdb::{
    Connection, RecordId, Surreal,
    engine::remote::ws::{Client, Ws},
    opt::auth::Root,
};
use tracing::{info, warn};

use crate::{
    config::Config,
    consts::auth_const::{ALL_TABLES, ROLE_TABLE, USER_TABLE},
    errors::{Error, Result},
    models::{
        role::Role,
        user::{EntityId, NewUser, UserRecord},
    },
};

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Looks a user up by identity provider uid.
    async fn find_by_uid(&self, uid: &str) -> Result<Option<UserRecord>>;

    async fn role_exists(&self, role_id: &EntityId) -> Result<bool>;

    async fn add_user(&self, user: NewUser) -> Result<UserRecord>;
}

#[derive(Debug, Deserialize)]
struct Created {
    #[allow(dead_code)]
    id: RecordId,
}

#[derive(Debug, Clone)]
pub struct SurrealDirectory<C: Connection = Client> {
    sdb: Surreal<C>,
}

impl SurrealDirectory<Client> {
    pub async fn connect(config: &Config) -> Result<Self> {
        let sdb = Surreal::new::<Ws>(config.db_address.as_str()).await?;
        sdb.signin(Root {
            username: &config.db_user,
            password: &config.db_pass,
        })
        .await?;
        sdb.use_ns(config.db_namespace.clone())
            .use_db(config.db_name.clone())
            .await?;

        info!(address = %config.db_address, "connected to surrealdb");
        Ok(Self::from_surreal(sdb))
    }
}

impl<C: Connection> SurrealDirectory<C> {
    /// Wraps a client whose namespace and database are already selected.
    pub fn from_surreal(sdb: Surreal<C>) -> Self {
        Self { sdb }
    }

    /// Deletes every row of every application table.
    pub async fn clean(&self) -> Result<()> {
        for table in ALL_TABLES {
            self.sdb
                .query("DELETE type::table($table);")
                .bind(("table", table))
                .await?
                .check()?;
            info!(table, "table cleaned");
        }
        Ok(())
    }
}

#[async_trait]
impl<C: Connection> UserDirectory for SurrealDirectory<C> {
    async fn find_by_uid(&self, uid: &str) -> Result<Option<UserRecord>> {
        let user = self
            .sdb
            .query(
                "SELECT record::id(id) AS id, uid, email, firstName, lastName, phone, organizationId, roleId, invitedBy, createdAt FROM type::table($table) WHERE uid = $uid LIMIT 1;",
            )
            .bind(("table", USER_TABLE))
            .bind(("uid", uid.to_string()))
            .await?
            .take::<Vec<UserRecord>>(0)?
            .into_iter()
            .next();
        Ok(user)
    }

    async fn role_exists(&self, role_id: &EntityId) -> Result<bool> {
        let role: Option<Role> = self.sdb.select(role_id.record(ROLE_TABLE)).await?;
        Ok(role.is_some())
    }

    async fn add_user(&self, user: NewUser) -> Result<UserRecord> {
        let created: Option<Created> = self
            .sdb
            .create((USER_TABLE, user.uid.clone()))
            .content(user.clone())
            .await?;

        match created {
            Some(_) => {
                let key = EntityId::Str(user.uid.clone());
                Ok(user.into_record(key))
            }
            None => {
                warn!(uid = %user.uid, "surrealdb returned no record on create");
                Err(Error::Unknown)
            }
        }
    }
}
