//! Query Keys
//!
//! Normalized keys derived from URL query parameters, plus the params each
//! view writes back when the user acts.

use std::fmt;

use crate::router::QueryParams;

pub const SEARCH_PARAM: &str = "q";
pub const SORT_BY_PARAM: &str = "sortBy";
pub const SORT_DIRECTION_PARAM: &str = "sortDirection";

/// Partial-name filter; empty and absent `q` both mean "no filter"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery(Option<String>);

impl SearchQuery {
    pub fn new(term: &str) -> Self {
        if term.is_empty() {
            Self(None)
        } else {
            Self(Some(term.to_string()))
        }
    }

    pub fn from_params(params: &QueryParams) -> Self {
        params
            .get(SEARCH_PARAM)
            .map(|term| Self::new(term))
            .unwrap_or_default()
    }

    pub fn term(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Params for navigating to this query; no filter means no `q` at all
    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        if let Some(term) = &self.0 {
            params.insert(SEARCH_PARAM.to_string(), term.clone());
        }
        params
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.term().unwrap_or(""))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    FirstName,
    LastName,
    CompanyName,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::FirstName => "firstName",
            SortField::LastName => "lastName",
            SortField::CompanyName => "companyName",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// One of the fixed sort choices offered by the sort view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortOption {
    pub field: SortField,
    pub direction: SortDirection,
    pub label: &'static str,
}

/// Sort options, in display order. The first one is the fallback.
pub const SORT_OPTIONS: &[SortOption] = &[
    SortOption { field: SortField::FirstName, direction: SortDirection::Asc, label: "First Name, Ascending" },
    SortOption { field: SortField::FirstName, direction: SortDirection::Desc, label: "First Name, Descending" },
    SortOption { field: SortField::LastName, direction: SortDirection::Asc, label: "Last Name, Ascending" },
    SortOption { field: SortField::LastName, direction: SortDirection::Desc, label: "Last Name, Descending" },
    SortOption { field: SortField::CompanyName, direction: SortDirection::Asc, label: "Company Name, Ascending" },
    SortOption { field: SortField::CompanyName, direction: SortDirection::Desc, label: "Company Name, Descending" },
];

impl Default for SortOption {
    fn default() -> Self {
        SORT_OPTIONS[0]
    }
}

impl SortOption {
    /// Resolve `sortBy` / `sortDirection`; anything unrecognized yields the default
    pub fn from_params(params: &QueryParams) -> Self {
        let sort_by = params.get(SORT_BY_PARAM).map(String::as_str);
        let direction = params.get(SORT_DIRECTION_PARAM).map(String::as_str);
        SORT_OPTIONS
            .iter()
            .find(|o| Some(o.field.as_str()) == sort_by && Some(o.direction.as_str()) == direction)
            .copied()
            .unwrap_or_default()
    }

    /// Resolve a display label; unknown labels yield the default
    pub fn from_label(label: &str) -> Self {
        SORT_OPTIONS
            .iter()
            .find(|o| o.label == label)
            .copied()
            .unwrap_or_default()
    }

    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.insert(SORT_BY_PARAM.to_string(), self.field.as_str().to_string());
        params.insert(SORT_DIRECTION_PARAM.to_string(), self.direction.as_str().to_string());
        params
    }
}

/// Params written by the sort view; no selection clears both keys
pub fn sort_params(option: Option<SortOption>) -> QueryParams {
    option.map(|o| o.to_params()).unwrap_or_default()
}

/// Params written by the search view
pub fn search_params(term: &str) -> QueryParams {
    SearchQuery::new(term).to_params()
}

/// Total: every input maps to one of `SORT_OPTIONS`
pub fn parse_query_params(params: &QueryParams) -> SortOption {
    SortOption::from_params(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> QueryParams {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_empty_and_absent_q_are_the_same_query() {
        let absent = SearchQuery::from_params(&QueryParams::new());
        let empty = SearchQuery::from_params(&params(&[("q", "")]));
        assert_eq!(absent, empty);
        assert_eq!(absent.term(), None);
        assert_eq!(SearchQuery::from_params(&params(&[("q", "ick")])).term(), Some("ick"));
    }

    #[test]
    fn test_search_params_omit_empty_term() {
        assert!(search_params("").is_empty());
        assert_eq!(search_params("icky"), params(&[("q", "icky")]));
    }

    #[test]
    fn test_every_option_round_trips_through_params() {
        assert_eq!(SORT_OPTIONS.len(), 6);
        for option in SORT_OPTIONS {
            assert_eq!(parse_query_params(&option.to_params()), *option);
            assert_eq!(SortOption::from_label(option.label), *option);
        }
    }

    #[test]
    fn test_unknown_combinations_fall_back_to_first_option() {
        let fallback = SORT_OPTIONS[0];
        assert_eq!(fallback.field, SortField::FirstName);
        assert_eq!(fallback.direction, SortDirection::Asc);

        for input in [
            params(&[]),
            params(&[("sortBy", "lastName")]),
            params(&[("sortDirection", "desc")]),
            params(&[("sortBy", "age"), ("sortDirection", "asc")]),
            params(&[("sortBy", "lastName"), ("sortDirection", "DESC")]),
            params(&[("q", "ick")]),
        ] {
            assert_eq!(parse_query_params(&input), fallback, "{input:?}");
        }
        assert_eq!(SortOption::from_label("Shoe Size, Ascending"), fallback);
    }

    #[test]
    fn test_company_name_descending_params() {
        let option = SortOption::from_label("Company Name, Descending");
        assert_eq!(
            sort_params(Some(option)),
            params(&[("sortBy", "companyName"), ("sortDirection", "desc")])
        );
        assert!(sort_params(None).is_empty());
    }
}
