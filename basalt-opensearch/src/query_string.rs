//! The `query_string` relevance function.
//!
//! ```sql
//! SELECT Id FROM beer WHERE query_string(['Tags' ^ 1.5, Title], 'taste', default_operator='and')
//! ```
//!
//! Fields and query are mandatory, every other argument is a named parameter. Parameters are
//! checked before the query reaches the backend, so a typo fails the statement instead of
//! being silently ignored.
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use derive_more::From;
use enumset::{EnumSet, EnumSetType};
use itertools::Itertools;
use serde::{Serialize, Serializer};
use serde_json::{json, Value};
use strum_macros::{AsRefStr, EnumString};

use crate::error::QueryValidationError;

use QueryStringParam as P;

/// Value of a named argument, as written in the statement.
#[derive(Clone, Debug, PartialEq, From)]
pub enum ArgumentValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl From<&str> for ArgumentValue {
    fn from(s: &str) -> Self {
        ArgumentValue::String(s.to_string())
    }
}

impl Display for ArgumentValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ArgumentValue::Bool(b) => write!(f, "{}", b),
            ArgumentValue::Integer(i) => write!(f, "{}", i),
            ArgumentValue::Float(v) => write!(f, "{}", v),
            ArgumentValue::String(s) => write!(f, "{:?}", s),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NamedArgument {
    pub name: String,
    pub value: ArgumentValue,
}

impl NamedArgument {
    pub fn new<N: Into<String>, V: Into<ArgumentValue>>(name: N, value: V) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Optional parameters of `query_string`. Names are matched case-insensitively.
#[derive(EnumSetType, Debug, EnumString, AsRefStr, strum_macros::Display)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum QueryStringParam {
    AllowLeadingWildcard,
    AnalyzeWildcard,
    Analyzer,
    AutoGenerateSynonymsPhraseQuery,
    Boost,
    DefaultOperator,
    EnablePositionIncrements,
    Escape,
    Fuzziness,
    FuzzyMaxExpansions,
    FuzzyPrefixLength,
    FuzzyRewrite,
    FuzzyTranspositions,
    Lenient,
    MaxDeterminizedStates,
    MinimumShouldMatch,
    PhraseSlop,
    QuoteAnalyzer,
    QuoteFieldSuffix,
    Rewrite,
    TieBreaker,
    TimeZone,
    Type,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, EnumString, AsRefStr, Serialize)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum DefaultOperator {
    #[default]
    Or,
    And,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, EnumString, AsRefStr, Serialize)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum MultiMatchType {
    #[default]
    BestFields,
    MostFields,
    CrossFields,
    Phrase,
    PhrasePrefix,
    BoolPrefix,
}

/// Allowed edit distance of fuzzy matching.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Fuzziness {
    /// Edit distance chosen from term length.
    #[default]
    Auto,
    /// Like [`Fuzziness::Auto`] with custom term length thresholds.
    AutoRange { low: u32, high: u32 },
    Edits(u8),
}

impl FromStr for Fuzziness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("auto") {
            return Ok(Fuzziness::Auto);
        }
        let auto_range = s
            .get(..5)
            .filter(|prefix| prefix.eq_ignore_ascii_case("auto:"))
            .and_then(|_| s.get(5..));
        if let Some(range) = auto_range {
            let (low, high) = range
                .split_once(',')
                .ok_or_else(|| "expected AUTO:low,high".to_string())?;
            let low = low.trim().parse::<u32>().map_err(|e| e.to_string())?;
            let high = high.trim().parse::<u32>().map_err(|e| e.to_string())?;
            if low > high {
                return Err(format!("low distance {} exceeds high distance {}", low, high));
            }
            return Ok(Fuzziness::AutoRange { low, high });
        }
        match s.parse::<u8>() {
            Ok(edits) if edits <= 2 => Ok(Fuzziness::Edits(edits)),
            _ => Err("expected AUTO, AUTO:low,high, 0, 1 or 2".to_string()),
        }
    }
}

impl Display for Fuzziness {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Fuzziness::Auto => write!(f, "AUTO"),
            Fuzziness::AutoRange { low, high } => write!(f, "AUTO:{},{}", low, high),
            Fuzziness::Edits(edits) => write!(f, "{}", edits),
        }
    }
}

impl Serialize for Fuzziness {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// How multi term queries are rewritten.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RewriteMethod {
    ConstantScore,
    ConstantScoreBoolean,
    ScoringBoolean,
    TopTerms(u32),
    TopTermsBoost(u32),
    TopTermsBlendedFreqs(u32),
}

impl FromStr for RewriteMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        let top_terms = |prefix: &str| -> Option<Result<u32, String>> {
            s.strip_prefix(prefix).map(|n| match n.parse::<u32>() {
                Ok(n) if n > 0 => Ok(n),
                _ => Err(format!("{}N expects a positive N", prefix)),
            })
        };

        match s.as_str() {
            "constant_score" => Ok(RewriteMethod::ConstantScore),
            "constant_score_boolean" => Ok(RewriteMethod::ConstantScoreBoolean),
            "scoring_boolean" => Ok(RewriteMethod::ScoringBoolean),
            _ => {
                if let Some(n) = top_terms("top_terms_blended_freqs_") {
                    n.map(RewriteMethod::TopTermsBlendedFreqs)
                } else if let Some(n) = top_terms("top_terms_boost_") {
                    n.map(RewriteMethod::TopTermsBoost)
                } else if let Some(n) = top_terms("top_terms_") {
                    n.map(RewriteMethod::TopTerms)
                } else {
                    Err("unknown rewrite method".to_string())
                }
            }
        }
    }
}

impl Display for RewriteMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RewriteMethod::ConstantScore => write!(f, "constant_score"),
            RewriteMethod::ConstantScoreBoolean => write!(f, "constant_score_boolean"),
            RewriteMethod::ScoringBoolean => write!(f, "scoring_boolean"),
            RewriteMethod::TopTerms(n) => write!(f, "top_terms_{}", n),
            RewriteMethod::TopTermsBoost(n) => write!(f, "top_terms_boost_{}", n),
            RewriteMethod::TopTermsBlendedFreqs(n) => write!(f, "top_terms_blended_freqs_{}", n),
        }
    }
}

impl Serialize for RewriteMethod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Explicitly given parameters. `None` means the backend default applies.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct QueryStringOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_leading_wildcard: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyze_wildcard: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_generate_synonyms_phrase_query: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boost: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_operator: Option<DefaultOperator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_position_increments: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub escape: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuzziness: Option<Fuzziness>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuzzy_max_expansions: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuzzy_prefix_length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuzzy_rewrite: Option<RewriteMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuzzy_transpositions: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lenient: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_determinized_states: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_should_match: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phrase_slop: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_analyzer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_field_suffix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewrite: Option<RewriteMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tie_breaker: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub multi_match_type: Option<MultiMatchType>,
}

impl QueryStringOptions {
    fn set(
        &mut self,
        param: QueryStringParam,
        value: &ArgumentValue,
    ) -> Result<(), QueryValidationError> {
        match param {
            P::AllowLeadingWildcard => self.allow_leading_wildcard = Some(to_bool(param, value)?),
            P::AnalyzeWildcard => self.analyze_wildcard = Some(to_bool(param, value)?),
            P::Analyzer => self.analyzer = Some(to_string(param, value)?),
            P::AutoGenerateSynonymsPhraseQuery => {
                self.auto_generate_synonyms_phrase_query = Some(to_bool(param, value)?)
            }
            P::Boost => {
                let boost = to_float(param, value)?;
                check(param, value, boost >= 0.0, "must not be negative")?;
                self.boost = Some(boost)
            }
            P::DefaultOperator => self.default_operator = Some(parse(param, value)?),
            P::EnablePositionIncrements => {
                self.enable_position_increments = Some(to_bool(param, value)?)
            }
            P::Escape => self.escape = Some(to_bool(param, value)?),
            P::Fuzziness => {
                let fuzziness = match value {
                    ArgumentValue::Integer(i) => i.to_string(),
                    _ => to_string(param, value)?,
                };
                self.fuzziness = Some(parse_str(param, value, &fuzziness)?)
            }
            P::FuzzyMaxExpansions => self.fuzzy_max_expansions = Some(to_positive(param, value)?),
            P::FuzzyPrefixLength => self.fuzzy_prefix_length = Some(to_unsigned(param, value)?),
            P::FuzzyRewrite => self.fuzzy_rewrite = Some(parse(param, value)?),
            P::FuzzyTranspositions => self.fuzzy_transpositions = Some(to_bool(param, value)?),
            P::Lenient => self.lenient = Some(to_bool(param, value)?),
            P::MaxDeterminizedStates => {
                self.max_determinized_states = Some(to_positive(param, value)?)
            }
            P::MinimumShouldMatch => {
                let spec = match value {
                    ArgumentValue::Integer(i) => i.to_string(),
                    _ => to_string(param, value)?,
                };
                check(
                    param,
                    value,
                    is_minimum_should_match(&spec),
                    "expected an integer, a percentage or conditions like 2<-25%",
                )?;
                self.minimum_should_match = Some(spec)
            }
            P::PhraseSlop => self.phrase_slop = Some(to_unsigned(param, value)?),
            P::QuoteAnalyzer => self.quote_analyzer = Some(to_string(param, value)?),
            P::QuoteFieldSuffix => self.quote_field_suffix = Some(to_string(param, value)?),
            P::Rewrite => self.rewrite = Some(parse(param, value)?),
            P::TieBreaker => {
                let tie_breaker = to_float(param, value)?;
                check(
                    param,
                    value,
                    (0.0..=1.0).contains(&tie_breaker),
                    "must be between 0 and 1",
                )?;
                self.tie_breaker = Some(tie_breaker)
            }
            P::TimeZone => {
                let time_zone = to_string(param, value)?;
                check(param, value, is_time_zone(&time_zone), "unknown time zone")?;
                self.time_zone = Some(time_zone)
            }
            P::Type => self.multi_match_type = Some(parse(param, value)?),
        }
        Ok(())
    }
}

/// A validated `query_string` call.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryStringQuery {
    fields: Vec<(String, f32)>,
    query: String,
    options: QueryStringOptions,
}

impl QueryStringQuery {
    pub fn try_new<Q: Into<String>>(
        fields: Vec<(String, f32)>,
        query: Q,
        args: Vec<NamedArgument>,
    ) -> Result<Self, QueryValidationError> {
        if fields.is_empty() {
            return Err(QueryValidationError::EmptyFields);
        }
        if let Some((field, weight)) = fields
            .iter()
            .find(|(field, weight)| field.is_empty() || !weight.is_finite() || *weight <= 0.0)
        {
            return Err(QueryValidationError::InvalidFieldWeight {
                field: field.clone(),
                weight: *weight,
            });
        }

        let query = query.into();
        if query.trim().is_empty() {
            return Err(QueryValidationError::EmptyQuery);
        }

        let mut given = EnumSet::<QueryStringParam>::new();
        let mut options = QueryStringOptions::default();
        for arg in &args {
            let param = QueryStringParam::from_str(arg.name.trim())
                .map_err(|_| QueryValidationError::UnknownParameter(arg.name.clone()))?;
            if !given.insert(param) {
                return Err(QueryValidationError::DuplicateParameter(param));
            }
            options.set(param, &arg.value)?;
        }

        Ok(Self {
            fields,
            query,
            options,
        })
    }

    pub fn fields(&self) -> &[(String, f32)] {
        &self.fields
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn options(&self) -> &QueryStringOptions {
        &self.options
    }

    pub fn default_operator(&self) -> DefaultOperator {
        self.options.default_operator.unwrap_or_default()
    }

    pub fn fuzziness(&self) -> Fuzziness {
        self.options.fuzziness.unwrap_or_default()
    }

    pub fn multi_match_type(&self) -> MultiMatchType {
        self.options.multi_match_type.unwrap_or_default()
    }

    pub fn boost(&self) -> f32 {
        self.options.boost.unwrap_or(1.0)
    }

    pub fn fuzzy_max_expansions(&self) -> u32 {
        self.options.fuzzy_max_expansions.unwrap_or(50)
    }

    pub fn max_determinized_states(&self) -> u32 {
        self.options.max_determinized_states.unwrap_or(10000)
    }

    pub fn allow_leading_wildcard(&self) -> bool {
        self.options.allow_leading_wildcard.unwrap_or(true)
    }

    pub fn lenient(&self) -> bool {
        self.options.lenient.unwrap_or(false)
    }

    /// Renders the `query_string` clause of the search request body.
    pub fn to_query_dsl(&self) -> serde_json::Result<Value> {
        let mut clause = serde_json::to_value(&self.options)?;
        if let Value::Object(map) = &mut clause {
            map.insert("query".to_string(), Value::String(self.query.clone()));
            map.insert(
                "fields".to_string(),
                Value::Array(
                    self.fields
                        .iter()
                        .map(|(field, weight)| Value::String(format!("{}^{}", field, weight)))
                        .collect(),
                ),
            );
        }
        Ok(json!({ "query_string": clause }))
    }
}

fn invalid(param: QueryStringParam, value: &ArgumentValue, reason: &str) -> QueryValidationError {
    QueryValidationError::InvalidValue {
        param,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn check(
    param: QueryStringParam,
    value: &ArgumentValue,
    ok: bool,
    reason: &str,
) -> Result<(), QueryValidationError> {
    if ok {
        Ok(())
    } else {
        Err(invalid(param, value, reason))
    }
}

fn to_bool(param: QueryStringParam, value: &ArgumentValue) -> Result<bool, QueryValidationError> {
    match value {
        ArgumentValue::Bool(b) => Ok(*b),
        ArgumentValue::String(s) if s.eq_ignore_ascii_case("true") => Ok(true),
        ArgumentValue::String(s) if s.eq_ignore_ascii_case("false") => Ok(false),
        _ => Err(invalid(param, value, "expected true or false")),
    }
}

fn to_string(
    param: QueryStringParam,
    value: &ArgumentValue,
) -> Result<String, QueryValidationError> {
    match value {
        ArgumentValue::String(s) => Ok(s.clone()),
        _ => Err(invalid(param, value, "expected a string")),
    }
}

fn to_integer(param: QueryStringParam, value: &ArgumentValue) -> Result<i64, QueryValidationError> {
    match value {
        ArgumentValue::Integer(i) => Ok(*i),
        ArgumentValue::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| invalid(param, value, "expected an integer")),
        _ => Err(invalid(param, value, "expected an integer")),
    }
}

fn to_unsigned(param: QueryStringParam, value: &ArgumentValue) -> Result<u32, QueryValidationError> {
    u32::try_from(to_integer(param, value)?)
        .map_err(|_| invalid(param, value, "must not be negative"))
}

fn to_positive(param: QueryStringParam, value: &ArgumentValue) -> Result<u32, QueryValidationError> {
    match to_unsigned(param, value)? {
        0 => Err(invalid(param, value, "must be positive")),
        n => Ok(n),
    }
}

fn to_float(param: QueryStringParam, value: &ArgumentValue) -> Result<f32, QueryValidationError> {
    let v = match value {
        ArgumentValue::Float(v) => *v as f32,
        ArgumentValue::Integer(i) => *i as f32,
        ArgumentValue::String(s) => s
            .trim()
            .parse::<f32>()
            .map_err(|_| invalid(param, value, "expected a number"))?,
        ArgumentValue::Bool(_) => return Err(invalid(param, value, "expected a number")),
    };
    check(param, value, v.is_finite(), "expected a finite number")?;
    Ok(v)
}

fn parse<T>(param: QueryStringParam, value: &ArgumentValue) -> Result<T, QueryValidationError>
where
    T: FromStr,
    T::Err: Display,
{
    let s = to_string(param, value)?;
    parse_str(param, value, &s)
}

fn parse_str<T>(
    param: QueryStringParam,
    value: &ArgumentValue,
    s: &str,
) -> Result<T, QueryValidationError>
where
    T: FromStr,
    T::Err: Display,
{
    T::from_str(s).map_err(|e| invalid(param, value, &e.to_string()))
}

/// `-2`, `75%`, `3<90%` or several conditions like `2<-25% 9<-3`.
fn is_minimum_should_match(spec: &str) -> bool {
    fn is_value(s: &str) -> bool {
        let s = s.strip_prefix('-').unwrap_or(s);
        let s = s.strip_suffix('%').unwrap_or(s);
        !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
    }

    let tokens = spec.split_whitespace().collect_vec();
    match tokens.as_slice() {
        [] => false,
        [single] if is_value(single) => true,
        _ => tokens.iter().all(|token| match token.split_once('<') {
            Some((count, value)) => {
                !count.is_empty() && count.chars().all(|c| c.is_ascii_digit()) && is_value(value)
            }
            None => false,
        }),
    }
}

/// `UTC`, `Z`, an offset like `+08:00`, or a region id like `Canada/Pacific`.
fn is_time_zone(s: &str) -> bool {
    if s.eq_ignore_ascii_case("utc") || s == "Z" {
        return true;
    }

    if let Some(offset) = s.strip_prefix('+').or_else(|| s.strip_prefix('-')) {
        return match offset.split_once(':') {
            Some((hours, minutes)) => {
                matches!(hours.parse::<u32>(), Ok(h) if h <= 18 && hours.len() == 2)
                    && matches!(minutes.parse::<u32>(), Ok(m) if m < 60 && minutes.len() == 2)
            }
            None => false,
        };
    }

    let segments = s.split('/').collect_vec();
    segments.len() >= 2
        && segments.iter().all(|segment| {
            segment.starts_with(|c: char| c.is_ascii_uppercase())
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+'))
        })
}
