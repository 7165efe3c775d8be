use crate::client::{Yql, YqlResponse};
use crate::config::ClientConfig;
use crate::constants::FINANCE_RSS_URL;
use crate::errors::AppResult;
use crate::query::{Condition, Select};
use chrono::{Datelike, Duration, Local, NaiveDate};
use url::form_urlencoded;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Queries the community `yahoo.finance.*` tables.
///
/// Every query runs in community mode since none of these tables are built in.
#[derive(Debug)]
pub struct StockRetriever {
    yql: Yql,
}

impl StockRetriever {
    pub fn new(mut config: ClientConfig) -> AppResult<Self> {
        config.community = true;
        Ok(Self {
            yql: Yql::new(config)?,
        })
    }

    pub fn from_client(mut yql: Yql) -> Self {
        yql.set_community(true);
        Self { yql }
    }

    pub fn client(&self) -> &Yql {
        &self.yql
    }

    /// Quotes for each symbol; `columns` empty selects everything.
    pub async fn get_current_info(
        &self,
        symbols: &[&str],
        columns: &[&str],
    ) -> AppResult<YqlResponse> {
        self.yql.execute(current_info_query(symbols, columns)).await
    }

    /// The two latest headlines for a symbol.
    pub async fn get_news_feed(&self, symbol: &str) -> AppResult<YqlResponse> {
        self.yql.execute(news_feed_query(symbol)).await
    }

    /// Daily prices between two dates, defaulting to last week.
    pub async fn get_historical_info(
        &self,
        symbol: &str,
        items: &[&str],
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        limit: Option<u32>,
    ) -> AppResult<YqlResponse> {
        let today = Local::now().date_naive();
        let query = historical_info_query(symbol, items, start, end, limit, today);
        self.yql.execute(query).await
    }

    pub async fn get_options_info(
        &self,
        symbol: &str,
        items: &[&str],
        expiration: Option<&str>,
    ) -> AppResult<YqlResponse> {
        self.yql
            .execute(options_info_query(symbol, items, expiration))
            .await
    }

    pub async fn get_index_summary(&self, index: &str, items: &[&str]) -> AppResult<YqlResponse> {
        let query = symbol_query("yahoo.finance.quoteslist", items, index);
        self.yql.execute(query).await
    }

    pub async fn get_industry_index(&self, id: u32, items: &[&str]) -> AppResult<YqlResponse> {
        let query = Select::new("yahoo.finance.industry")
            .items(items.iter().copied())
            .filter(Condition::equals("id", id.to_string()));
        self.yql.execute(query).await
    }

    /// Exchange rates for currency pairs such as `EURUSD`.
    pub async fn get_xchange_rate(&self, pairs: &[&str], items: &[&str]) -> AppResult<YqlResponse> {
        let query = Select::new("yahoo.finance.xchange")
            .items(items.iter().copied())
            .filter(Condition::is_in("pair", pairs.iter().copied()));
        self.yql.execute(query).await
    }

    pub async fn get_dividend_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        items: &[&str],
    ) -> AppResult<YqlResponse> {
        let query = symbol_query("yahoo.finance.dividendhistory", items, symbol)
            .filter(Condition::equals("startDate", start.format(DATE_FORMAT).to_string()))
            .filter(Condition::equals("endDate", end.format(DATE_FORMAT).to_string()));
        self.yql.execute(query).await
    }

    pub async fn get_balance_sheet(&self, symbol: &str) -> AppResult<YqlResponse> {
        let query = symbol_query("yahoo.finance.balancesheet", &[], symbol);
        self.yql.execute(query).await
    }

    /// Finds the ticker symbols of a company.
    pub async fn stock_lookup(&self, company: &str) -> AppResult<YqlResponse> {
        let query =
            Select::new("yahoo.finance.stocks").filter(Condition::equals("company", company));
        self.yql.execute(query).await
    }
}

fn symbol_query(table: &str, items: &[&str], symbol: &str) -> Select {
    Select::new(table)
        .items(items.iter().copied())
        .filter(Condition::equals("symbol", symbol))
}

fn current_info_query(symbols: &[&str], columns: &[&str]) -> Select {
    Select::new("yahoo.finance.quotes")
        .items(columns.iter().copied())
        .filter(Condition::is_in("symbol", symbols.iter().copied()))
}

fn news_feed_query(symbol: &str) -> Select {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("s", symbol)
        .finish();
    Select::new("rss")
        .items(["title", "link", "description"])
        .filter(Condition::equals("url", format!("{FINANCE_RSS_URL}?{query}")))
        .limit(2)
}

fn historical_info_query(
    symbol: &str,
    items: &[&str],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    limit: Option<u32>,
    today: NaiveDate,
) -> Select {
    let (default_start, default_end) = last_week(today);
    let start = start.unwrap_or(default_start);
    let end = end.unwrap_or(default_end);

    let mut query = symbol_query("yahoo.finance.historicaldata", items, symbol)
        .filter(Condition::equals("startDate", start.format(DATE_FORMAT).to_string()))
        .filter(Condition::equals("endDate", end.format(DATE_FORMAT).to_string()));
    if let Some(limit) = limit {
        query = query.limit(limit);
    }
    query
}

fn options_info_query(symbol: &str, items: &[&str], expiration: Option<&str>) -> Select {
    let query = symbol_query("yahoo.finance.options", items, symbol);
    match expiration.filter(|e| !e.is_empty()) {
        Some(expiration) => query.filter(Condition::equals("expiration", expiration)),
        None => query,
    }
}

/// Monday to Friday of the week before `today`.
fn last_week(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
    let start = monday - Duration::days(7);
    (start, start + Duration::days(4))
}
