use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouterError {
    #[error("invalid route pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A URL pattern bound to a page.
#[derive(Debug, Clone)]
pub struct Route<P> {
    pattern: Regex,
    page: P,
}

impl<P: Copy> Route<P> {
    pub fn new(pattern: &str, page: P) -> Result<Self, RouterError> {
        let pattern = Regex::new(pattern).map_err(|source| RouterError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { pattern, page })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn page(&self) -> P {
        self.page
    }

    pub fn matches(&self, url: &str) -> bool {
        self.pattern.is_match(url)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteMatch<P> {
    Page(P),
    NotFound,
}

/// Ordered, read-only list of routes. The first matching route wins.
#[derive(Debug, Clone)]
pub struct RouteTable<P> {
    routes: Vec<Route<P>>,
}

impl<P: Copy> Default for RouteTable<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Copy> RouteTable<P> {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Append a route after all routes declared so far.
    pub fn route(mut self, pattern: &str, page: P) -> Result<Self, RouterError> {
        self.routes.push(Route::new(pattern, page)?);
        Ok(self)
    }

    pub fn routes(&self) -> &[Route<P>] {
        &self.routes
    }

    pub fn match_url(&self, url: &str) -> RouteMatch<P> {
        self.routes
            .iter()
            .find(|route| route.matches(url))
            .map_or(RouteMatch::NotFound, |route| RouteMatch::Page(route.page()))
    }
}

/// Select the page for `url` from `routes`.
pub fn match_route<P: Copy>(url: &str, routes: &RouteTable<P>) -> RouteMatch<P> {
    routes.match_url(url)
}
