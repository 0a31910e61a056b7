use serde::Deserialize;

/// Query string for a search endpoint. Only non-blank, trimmed values are kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchParams(Vec<(&'static str, String)>);

impl SearchParams {
    fn push(&mut self, key: &'static str, value: Option<&str>) {
        if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
            self.0.push((key, value.to_string()));
        }
    }

    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.0
    }

    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Structured job filter. Field names match the upstream search parameters.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobFilter {
    pub title: Option<String>,
    pub level: Option<String>,
    pub location: Option<String>,
    pub min_salary: Option<String>,
    pub max_salary: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InterviewFilter {
    pub company: Option<String>,
    pub format: Option<String>,
    pub round: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Free text searches by title unless the filter already names one.
pub fn job_search_params(query: Option<&str>, filter: &JobFilter) -> SearchParams {
    let mut params = SearchParams::default();
    let title = non_blank(filter.title.as_deref()).or(non_blank(query));
    params.push("title", title);
    params.push("level", filter.level.as_deref());
    params.push("location", filter.location.as_deref());
    params.push("minSalary", filter.min_salary.as_deref());
    params.push("maxSalary", filter.max_salary.as_deref());
    params.push("status", filter.status.as_deref());
    params
}

/// Free text searches by company; the filter's company only applies without free text.
pub fn interview_search_params(query: Option<&str>, filter: &InterviewFilter) -> SearchParams {
    let mut params = SearchParams::default();
    params.push("company", non_blank(query).or(non_blank(filter.company.as_deref())));
    params.push("format", filter.format.as_deref());
    params.push("round", filter.round.as_deref());
    params.push("date", filter.date.as_deref());
    params.push("time", filter.time.as_deref());
    params
}
