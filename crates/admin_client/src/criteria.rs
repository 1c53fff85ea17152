use shared::domain::{CategoryType, SortDirection, UniversityStatus};

/// Fixed page size used by the admin list views.
pub const PAGE_SIZE: u32 = 10;

fn normalize_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Raw filter inputs as the user typed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryFilters {
    pub name: String,
    pub kind: Option<CategoryType>,
}

/// Request parameters for one category list fetch. Rebuilt whole on every
/// filter change, never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCriteria {
    pub name: Option<String>,
    pub types: Vec<CategoryType>,
    pub page: u32,
    pub size: u32,
    pub sort_by: String,
    pub sort_direction: SortDirection,
}

impl CategoryCriteria {
    pub fn build(filters: &CategoryFilters, page: u32) -> Self {
        // The backend requires an explicit type set; an unset filter means
        // every known value, not an omitted parameter.
        let types = match filters.kind {
            Some(kind) => vec![kind],
            None => CategoryType::ALL.to_vec(),
        };
        Self {
            name: normalize_name(&filters.name),
            types,
            page,
            size: PAGE_SIZE,
            sort_by: "createdAt".to_string(),
            sort_direction: SortDirection::Desc,
        }
    }

    /// Query pairs with repeated keys for the set filter
    /// (`types=TOPIC&types=PRODUCT`), matching the backend's parameter
    /// binding.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![
            ("page".to_string(), self.page.to_string()),
            ("size".to_string(), self.size.to_string()),
            ("sortBy".to_string(), self.sort_by.clone()),
            (
                "sortDirection".to_string(),
                self.sort_direction.as_str().to_string(),
            ),
        ];
        if let Some(name) = &self.name {
            query.push(("name".to_string(), name.clone()));
        }
        for kind in &self.types {
            query.push(("types".to_string(), kind.as_str().to_string()));
        }
        query
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UniversityFilters {
    pub name: String,
    pub status: Option<UniversityStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniversityCriteria {
    pub name: Option<String>,
    pub statuses: Vec<UniversityStatus>,
    pub page: u32,
    pub size: u32,
    pub sort_by: String,
    pub sort_direction: SortDirection,
}

impl UniversityCriteria {
    pub fn build(filters: &UniversityFilters, page: u32) -> Self {
        let statuses = match filters.status {
            Some(status) => vec![status],
            None => UniversityStatus::ALL.to_vec(),
        };
        Self {
            name: normalize_name(&filters.name),
            statuses,
            page,
            size: PAGE_SIZE,
            sort_by: "id".to_string(),
            sort_direction: SortDirection::Desc,
        }
    }

    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![
            ("page".to_string(), self.page.to_string()),
            ("size".to_string(), self.size.to_string()),
            ("sortBy".to_string(), self.sort_by.clone()),
            (
                "sortDirection".to_string(),
                self.sort_direction.as_str().to_string(),
            ),
        ];
        if let Some(name) = &self.name {
            query.push(("name".to_string(), name.clone()));
        }
        for status in &self.statuses {
            query.push(("statuses".to_string(), status.as_str().to_string()));
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_kind_filter_expands_to_every_known_type() {
        let criteria = CategoryCriteria::build(&CategoryFilters::default(), 0);
        assert_eq!(
            criteria.types,
            vec![CategoryType::Topic, CategoryType::Product]
        );
        assert_eq!(criteria.page, 0);
        assert_eq!(criteria.size, PAGE_SIZE);
    }

    #[test]
    fn selected_kind_is_sent_alone() {
        let filters = CategoryFilters {
            name: String::new(),
            kind: Some(CategoryType::Product),
        };
        let criteria = CategoryCriteria::build(&filters, 2);
        assert_eq!(criteria.types, vec![CategoryType::Product]);
        assert_eq!(criteria.page, 2);
    }

    #[test]
    fn name_is_trimmed_and_blank_means_no_filter() {
        let filters = CategoryFilters {
            name: "  Algorithms  ".to_string(),
            kind: None,
        };
        assert_eq!(
            CategoryCriteria::build(&filters, 0).name.as_deref(),
            Some("Algorithms")
        );

        let blank = CategoryFilters {
            name: "   ".to_string(),
            kind: None,
        };
        assert_eq!(CategoryCriteria::build(&blank, 0).name, None);
    }

    #[test]
    fn query_repeats_the_set_parameter_per_value() {
        let criteria = UniversityCriteria::build(&UniversityFilters::default(), 0);
        let query = criteria.to_query();
        let statuses: Vec<&str> = query
            .iter()
            .filter(|(key, _)| key == "statuses")
            .map(|(_, value)| value.as_str())
            .collect();
        assert_eq!(statuses, vec!["ACTIVE", "INACTIVE", "DELETED"]);
        assert!(query.contains(&("sortBy".to_string(), "id".to_string())));
        assert!(query.contains(&("sortDirection".to_string(), "DESC".to_string())));
        assert!(!query.iter().any(|(key, _)| key == "name"));
    }
}
