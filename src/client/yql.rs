use super::oauth::OAuth1;
use super::response::YqlResponse;
use crate::config::ClientConfig;
use crate::constants::COMMUNITY_ENV;
use crate::errors::AppResult;
use crate::models::ResponseFormat;
use crate::query::{Condition, Delete, FuncFilter, Insert, RemoteFilter, Select, Statement, Update};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// External table definition loaded with `use 'url' as name;`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UseTable {
    pub url: String,
    pub name: String,
}

/// YQL client.
///
/// Statements are sent one at a time as GET requests. Without credentials
/// the public endpoint is used; with OAuth credentials every request is
/// signed and sent to the private endpoint, refreshing the token first when
/// it has expired.
#[derive(Debug)]
pub struct Yql {
    client: reqwest::Client,
    config: ClientConfig,
    use_table: Option<UseTable>,
    oauth: Option<Mutex<OAuth1>>,
}

impl Yql {
    /// Creates a client; loads OAuth credentials when the config names a file.
    pub fn new(config: ClientConfig) -> AppResult<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        let oauth = match &config.credentials_file {
            Some(path) => Some(Mutex::new(OAuth1::from_file(path)?)),
            None => None,
        };

        Ok(Self {
            client,
            config,
            use_table: None,
            oauth,
        })
    }

    pub fn with_oauth(mut self, oauth: OAuth1) -> Self {
        self.oauth = Some(Mutex::new(oauth));
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn is_signed(&self) -> bool {
        self.oauth.is_some()
    }

    pub fn set_format(&mut self, format: ResponseFormat) {
        self.config.format = format;
    }

    pub fn set_community(&mut self, community: bool) {
        self.config.community = community;
    }

    /// Makes subsequent queries load an external table definition.
    pub fn use_table(&mut self, url: impl Into<String>, name: impl Into<String>) -> &UseTable {
        self.use_table.insert(UseTable {
            url: url.into(),
            name: name.into(),
        })
    }

    pub fn clear_use_table(&mut self) -> Option<UseTable> {
        self.use_table.take()
    }

    /// Renders a statement with the community environment and `use` prefixes.
    pub fn build_query(&self, statement: &Statement) -> AppResult<String> {
        let mut query = String::new();
        if self.config.community {
            query.push_str(&format!("env '{COMMUNITY_ENV}'; "));
        }
        if let Some(table) = &self.use_table {
            query.push_str(&format!("use '{}' as {}; ", table.url, table.name));
        }
        query.push_str(&statement.render()?);
        Ok(query)
    }

    /// Builds the request parameters for a query.
    pub fn payload(&self, query: &str, format: Option<ResponseFormat>) -> Vec<(&'static str, String)> {
        let format = format.unwrap_or(self.config.format);
        let mut payload = vec![
            ("q", query.to_string()),
            ("format", format.to_string()),
            ("diagnostics", self.config.diagnostics.to_string()),
            ("debug", self.config.debug.to_string()),
            ("callback", String::new()),
        ];
        if self.config.json_compact {
            payload.push(("jsonCompact", "new".to_string()));
        }
        if self.config.cross_product {
            payload.push(("crossProduct", "optimized".to_string()));
        }
        payload
    }

    /// Sends a hand-written query.
    pub async fn raw_query(
        &self,
        query: &str,
        format: Option<ResponseFormat>,
    ) -> AppResult<YqlResponse> {
        self.execute_as(Statement::Raw(query.to_string()), format)
            .await
    }

    pub async fn execute(&self, statement: impl Into<Statement>) -> AppResult<YqlResponse> {
        self.execute_as(statement, None).await
    }

    /// Sends a statement, overriding the configured response format when `format` is set.
    pub async fn execute_as(
        &self,
        statement: impl Into<Statement>,
        format: Option<ResponseFormat>,
    ) -> AppResult<YqlResponse> {
        let query = self.build_query(&statement.into())?;
        let format = format.unwrap_or(self.config.format);
        let payload = self.payload(&query, Some(format));
        debug!(query = %query, format = %format, signed = self.is_signed(), "Sending YQL query");
        self.send(&payload, format).await
    }

    async fn send(
        &self,
        payload: &[(&'static str, String)],
        format: ResponseFormat,
    ) -> AppResult<YqlResponse> {
        let request = match &self.oauth {
            Some(oauth) => {
                let mut oauth = oauth.lock().await;
                if !oauth.token_is_valid() {
                    warn!("OAuth access token expired, refreshing");
                    oauth
                        .refresh_token(&self.client, &self.config.token_url)
                        .await?;
                }
                let params: Vec<(String, String)> = payload
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect();
                let header = oauth.authorization_header("GET", &self.config.private_url, &params)?;
                self.client
                    .get(&self.config.private_url)
                    .query(payload)
                    .header(reqwest::header::AUTHORIZATION, header)
            }
            None => self.client.get(&self.config.public_url).query(payload),
        };

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!(
                status = status.as_u16(),
                "YQL request returned a non-success status"
            );
        }
        Ok(YqlResponse::new(status.as_u16(), body, format))
    }

    /// `desc table`
    pub async fn desc(&self, table: &str) -> AppResult<YqlResponse> {
        self.execute(Statement::Desc(table.to_string())).await
    }

    /// `SHOW TABLES`
    pub async fn show_tables(&self, format: Option<ResponseFormat>) -> AppResult<YqlResponse> {
        self.execute_as(Statement::ShowTables, format).await
    }

    /// Selects `items` (all columns when empty) from a table without conditions.
    pub async fn get(
        &self,
        table: &str,
        items: &[&str],
        limit: Option<u32>,
    ) -> AppResult<YqlResponse> {
        let mut select = Select::new(table).items(items.iter().copied());
        if let Some(limit) = limit {
            select = select.limit(limit);
        }
        self.execute(select).await
    }

    /// Starts a select; add conditions with [`Prepared::filter`] and send it.
    pub fn select(&self, table: &str, items: &[&str]) -> Prepared<'_, Select> {
        Prepared {
            yql: self,
            statement: Select::new(table).items(items.iter().copied()),
        }
    }

    pub async fn insert(
        &self,
        table: &str,
        items: &[&str],
        values: &[&str],
    ) -> AppResult<YqlResponse> {
        self.execute(Insert::new(
            table,
            items.iter().copied(),
            values.iter().copied(),
        ))
        .await
    }

    pub fn update(&self, table: &str, items: &[&str], values: &[&str]) -> Prepared<'_, Update> {
        Prepared {
            yql: self,
            statement: Update::new(table, items.iter().copied(), values.iter().copied()),
        }
    }

    pub fn delete(&self, table: &str) -> Prepared<'_, Delete> {
        Prepared {
            yql: self,
            statement: Delete::new(table),
        }
    }

    /// Looks up the GUID of a Yahoo user.
    pub async fn get_guid(&self, username: &str) -> AppResult<YqlResponse> {
        self.select("yahoo.identity", &[])
            .filter(Condition::equals("yid", username))
            .send()
            .await
    }
}

/// A statement bound to a client, waiting to be sent.
#[derive(Debug)]
pub struct Prepared<'a, S> {
    yql: &'a Yql,
    statement: S,
}

impl<'a, S> Prepared<'a, S>
where
    S: Into<Statement>,
{
    pub fn statement(&self) -> &S {
        &self.statement
    }

    pub fn into_statement(self) -> S {
        self.statement
    }

    pub async fn send(self) -> AppResult<YqlResponse> {
        self.yql.execute(self.statement).await
    }
}

impl<'a> Prepared<'a, Select> {
    pub fn filter(self, condition: Condition) -> Self {
        Self {
            yql: self.yql,
            statement: self.statement.filter(condition),
        }
    }

    pub fn limit(self, limit: u32) -> Self {
        Self {
            yql: self.yql,
            statement: self.statement.limit(limit),
        }
    }

    pub fn offset(self, offset: u32) -> Self {
        Self {
            yql: self.yql,
            statement: self.statement.offset(offset),
        }
    }

    pub fn remote_filter(self, filter: RemoteFilter) -> Self {
        Self {
            yql: self.yql,
            statement: self.statement.remote_filter(filter),
        }
    }

    pub fn func_filter(self, filter: FuncFilter) -> Self {
        Self {
            yql: self.yql,
            statement: self.statement.func_filter(filter),
        }
    }
}

impl<'a> Prepared<'a, Update> {
    pub fn filter(self, condition: Condition) -> Self {
        Self {
            yql: self.yql,
            statement: self.statement.filter(condition),
        }
    }
}

impl<'a> Prepared<'a, Delete> {
    pub fn filter(self, condition: Condition) -> Self {
        Self {
            yql: self.yql,
            statement: self.statement.filter(condition),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(config: ClientConfig) -> Yql {
        Yql::new(config).unwrap()
    }

    #[test]
    fn community_queries_get_env_prefix() {
        let yql = client(ClientConfig {
            community: true,
            ..Default::default()
        });
        let q = yql.build_query(&Statement::ShowTables).unwrap();
        assert_eq!(
            q,
            "env 'store://datatables.org/alltableswithkeys'; SHOW TABLES"
        );
    }

    #[test]
    fn use_table_prefix_is_added_and_cleared() {
        let mut yql = client(ClientConfig::default());
        yql.use_table("http://josuebrunel.org/users.xml", "users");
        let q = yql
            .build_query(&Statement::Raw("select * from users".into()))
            .unwrap();
        assert_eq!(
            q,
            "use 'http://josuebrunel.org/users.xml' as users; select * from users"
        );

        assert!(yql.clear_use_table().is_some());
        let q = yql
            .build_query(&Statement::Raw("select * from users".into()))
            .unwrap();
        assert_eq!(q, "select * from users");
    }

    #[test]
    fn payload_defaults() {
        let yql = client(ClientConfig::default());
        let payload = yql.payload("SHOW TABLES", None);
        assert_eq!(payload[0], ("q", "SHOW TABLES".to_string()));
        assert!(payload.contains(&("format", "json".to_string())));
        assert!(payload.contains(&("diagnostics", "false".to_string())));
        assert!(!payload.iter().any(|(k, _)| *k == "jsonCompact"));
        assert!(!payload.iter().any(|(k, _)| *k == "crossProduct"));
    }

    #[test]
    fn payload_options() {
        let yql = client(ClientConfig {
            json_compact: true,
            cross_product: true,
            diagnostics: true,
            ..Default::default()
        });
        let payload = yql.payload("SHOW TABLES", Some(ResponseFormat::Xml));
        assert!(payload.contains(&("format", "xml".to_string())));
        assert!(payload.contains(&("diagnostics", "true".to_string())));
        assert!(payload.contains(&("jsonCompact", "new".to_string())));
        assert!(payload.contains(&("crossProduct", "optimized".to_string())));
    }

    #[test]
    fn prepared_select_accumulates_clauses() {
        let yql = client(ClientConfig::default());
        let prepared = yql
            .select("geo.countries", &["name", "woeid"])
            .filter(Condition::equals("name", "Canada"))
            .limit(1);
        assert_eq!(
            prepared.statement().render().unwrap(),
            "SELECT name,woeid FROM geo.countries WHERE name = 'Canada' LIMIT 1"
        );
    }

    #[test]
    fn prepared_delete_and_update() {
        let yql = client(ClientConfig::default());
        let delete = yql
            .delete("yql.storage")
            .filter(Condition::equals("name", "store://x"))
            .into_statement();
        assert_eq!(
            delete.render().unwrap(),
            "DELETE FROM yql.storage WHERE name = 'store://x'"
        );

        let update = yql
            .update("yql.storage", &["value"], &["v"])
            .filter(Condition::equals("name", "store://x"))
            .into_statement();
        assert_eq!(
            update.render().unwrap(),
            "UPDATE yql.storage SET value='v' WHERE name = 'store://x'"
        );
    }

    #[test]
    fn invalid_config_is_rejected() {
        let result = Yql::new(ClientConfig {
            timeout_secs: 0,
            ..Default::default()
        });
        assert!(result.is_err());
    }
}
