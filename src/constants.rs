// YQL endpoints
pub const PUBLIC_URL: &str = "https://query.yahooapis.com/v1/public/yql";
pub const PRIVATE_URL: &str = "https://query.yahooapis.com/v1/yql";
pub const OAUTH_TOKEN_URL: &str = "https://api.login.yahoo.com/oauth/v2/get_token";

// Community tables environment, prepended to every query in community mode
pub const COMMUNITY_ENV: &str = "store://datatables.org/alltableswithkeys";

// Open Data Table schema
pub const TABLE_XMLNS: &str = "http://query.yahooapis.com/v1/schema/table.xsd";
pub const DEFAULT_POLLING_FREQUENCY_SECONDS: u32 = 30;
pub const DEFAULT_FUNCTION_TYPE: &str = "stream";

// OAuth tokens issued by Yahoo live for one hour
pub const OAUTH_TOKEN_LIFETIME_SECS: i64 = 3600;
pub const OAUTH_TOKEN_MARGIN_SECS: i64 = 60;
pub const OAUTH_REALM: &str = "yahooapis.com";

// Finance feeds
pub const FINANCE_RSS_URL: &str = "http://finance.yahoo.com/rss/headline";

// Response format aliases
pub const JSON_ALIASES: &[&str] = &["json", "j"];
pub const XML_ALIASES: &[&str] = &["xml", "x"];
