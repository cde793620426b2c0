//! Client-side filtering of cached collections.
//!
//! Each dashboard table has a closed filter type. A filter compiles once
//! into a [`Predicate`], a conjunction of clauses, and never mutates the
//! collection it is applied to.
//!
//! Dropdown values use a fixed set of `All …` entries ([`ALL_SENTINELS`]) to
//! mean "no filter". A dropdown value is inactive when it is blank or equals
//! one of them. Free-text search is inactive only when blank.
//!
//! ```
//! use fleetdesk::filter::{Filter, InvoiceFilter};
//!
//! let filter = InvoiceFilter {
//!     payment_method: "All Methods".to_string(),
//!     payment_status: "Paid".to_string(),
//!     search: String::new(),
//! };
//! assert_eq!(filter.compile().len(), 1);
//! ```

use crate::model::{
    ContactMessage, ContactStatus, CrewMemberView, InvoiceView, LicenseView, Session, User,
};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Dropdown entries that mean "no filter". Matched exactly.
pub const ALL_SENTINELS: [&str; 8] = [
    "All",
    "All Status",
    "All Methods",
    "All Vessels",
    "All Roles",
    "All Companies",
    "All Devices",
    "All Apps",
];

/// Whether a dropdown value means "no filter".
pub fn is_inactive(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || ALL_SENTINELS.contains(&value)
}

/// The lowercased dropdown value, or `None` if inactive.
fn active(value: &str) -> Option<String> {
    if is_inactive(value) {
        None
    } else {
        Some(value.trim().to_lowercase())
    }
}

/// The lowercased search text, or `None` if blank.
fn active_search(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_lowercase())
    }
}

/// Case-insensitive substring match. `needle` must already be lowercase.
pub fn matches_search(text: &str, needle: &str) -> bool {
    needle.is_empty() || text.to_lowercase().contains(needle)
}

/// True if any of `texts` contains `needle`.
pub fn matches_search_any(texts: &[&str], needle: &str) -> bool {
    needle.is_empty() || texts.iter().any(|t| matches_search(t, needle))
}

/// Case-insensitive equality. `expected` must already be lowercase.
pub fn equals_ignore_case(text: &str, expected: &str) -> bool {
    text.trim().to_lowercase() == expected
}

type Clause<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// Conjunction of clauses over `T`. No clauses matches everything.
pub struct Predicate<T> {
    clauses: Vec<Clause<T>>,
}

impl<T> Predicate<T> {
    pub fn all() -> Self {
        Predicate {
            clauses: Vec::new(),
        }
    }

    pub fn and(mut self, clause: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        self.clauses.push(Box::new(clause));
        self
    }

    /// Add a clause built from dropdown `value` when it is active.
    fn and_if<F>(self, value: &str, clause: impl FnOnce(String) -> F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        match active(value) {
            Some(needle) => self.and(clause(needle)),
            None => self,
        }
    }

    /// Add a substring clause over `fields` when `query` is not blank.
    fn and_search<F>(self, query: &str, fields: F) -> Self
    where
        T: 'static,
        F: Fn(&T) -> Vec<&str> + Send + Sync + 'static,
    {
        match active_search(query) {
            Some(needle) => self.and(move |item: &T| matches_search_any(&fields(item), &needle)),
            None => self,
        }
    }

    pub fn matches(&self, item: &T) -> bool {
        self.clauses.iter().all(|clause| clause(item))
    }

    /// Number of active clauses.
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn apply(&self, items: &[T]) -> Vec<T>
    where
        T: Clone,
    {
        items.iter().filter(|item| self.matches(item)).cloned().collect()
    }
}

impl<T> Default for Predicate<T> {
    fn default() -> Self {
        Predicate::all()
    }
}

/// A filter state that compiles into a predicate over `T`.
pub trait Filter<T> {
    fn compile(&self) -> Predicate<T>;

    fn apply(&self, items: &[T]) -> Vec<T>
    where
        T: Clone,
    {
        self.compile().apply(items)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InvoiceFilter {
    pub payment_method: String,
    /// `Paid` or `Unpaid`.
    pub payment_status: String,
    pub search: String,
}

impl Filter<InvoiceView> for InvoiceFilter {
    fn compile(&self) -> Predicate<InvoiceView> {
        Predicate::all()
            .and_if(&self.payment_method, |m| {
                move |i: &InvoiceView| equals_ignore_case(&i.payment_method, &m)
            })
            .and_if(&self.payment_status, |s| {
                move |i: &InvoiceView| equals_ignore_case(i.payment_status.as_str(), &s)
            })
            .and_search(&self.search, |i| {
                vec![i.invoice_code.as_str(), i.payment_method.as_str()]
            })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CrewFilter {
    pub vessel: String,
    pub role: String,
    /// `Active` or `Inactive`.
    pub status: String,
    pub search: String,
}

impl Filter<CrewMemberView> for CrewFilter {
    fn compile(&self) -> Predicate<CrewMemberView> {
        Predicate::all()
            .and_if(&self.vessel, |v| {
                move |c: &CrewMemberView| equals_ignore_case(&c.vessel, &v)
            })
            .and_if(&self.role, |r| {
                move |c: &CrewMemberView| equals_ignore_case(&c.role, &r)
            })
            .and_if(&self.status, |s| {
                move |c: &CrewMemberView| equals_ignore_case(c.status.as_str(), &s)
            })
            .and_search(&self.search, |c| {
                vec![c.name.as_str(), c.email.as_str()]
            })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LicenseFilter {
    pub company: String,
    pub vessel: String,
    /// `Valid`, `Expiring Soon` or `Expired`.
    pub status: String,
    pub search: String,
}

impl Filter<LicenseView> for LicenseFilter {
    fn compile(&self) -> Predicate<LicenseView> {
        Predicate::all()
            .and_if(&self.company, |c| {
                move |l: &LicenseView| equals_ignore_case(&l.company_name, &c)
            })
            .and_if(&self.vessel, |v| {
                move |l: &LicenseView| equals_ignore_case(&l.vessel_name, &v)
            })
            .and_if(&self.status, |s| {
                move |l: &LicenseView| equals_ignore_case(l.status.as_str(), &s)
            })
            .and_search(&self.search, |l| {
                vec![
                    l.license_code.as_str(),
                    l.company_name.as_str(),
                    l.vessel_name.as_str(),
                ]
            })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactFilter {
    pub status: String,
    pub search: String,
}

impl Filter<ContactMessage> for ContactFilter {
    fn compile(&self) -> Predicate<ContactMessage> {
        Predicate::all()
            .and_if(&self.status, |s| {
                move |m: &ContactMessage| m.status.as_str() == s
            })
            .and_search(&self.search, |m| {
                vec![m.name.as_str(), m.email.as_str()]
            })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub search: String,
    pub role: String,
    /// `active` or `inactive`.
    pub status: String,
    /// `verified` or `unverified`.
    pub email_verified: String,
}

impl Filter<User> for UserFilter {
    fn compile(&self) -> Predicate<User> {
        Predicate::all()
            .and_search(&self.search, |u: &User| {
                vec![u.name.as_str(), u.username.as_str(), u.email.as_str()]
            })
            .and_if(&self.role, |r| move |u: &User| equals_ignore_case(&u.role, &r))
            .and_if(&self.status, |s| {
                let want_active = s == "active";
                move |u: &User| u.user_status == want_active
            })
            .and_if(&self.email_verified, |v| {
                let want_verified = v == "verified";
                move |u: &User| u.email_verification == want_verified
            })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionFilter {
    pub search: String,
    /// Substring of the device name.
    pub device: String,
    pub app: String,
}

impl Filter<Session> for SessionFilter {
    fn compile(&self) -> Predicate<Session> {
        Predicate::all()
            .and_search(&self.search, |s: &Session| {
                vec![s.user.name.as_str(), s.user.username.as_str()]
            })
            .and_if(&self.device, |d| {
                move |s: &Session| matches_search(&s.device, &d)
            })
            .and_if(&self.app, |a| move |s: &Session| equals_ignore_case(&s.app, &a))
    }
}

/// One page of a filtered collection.
#[derive(Clone, Debug, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based, clamped into range.
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// Slice out page `page` (1-based). Out-of-range pages are clamped; a page
/// size of 0 uses [`DEFAULT_PAGE_SIZE`].
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = if page_size == 0 {
        DEFAULT_PAGE_SIZE
    } else {
        page_size
    };
    let total_pages = items.len().div_ceil(page_size);
    let page = page.clamp(1, total_pages.max(1));
    let start = (page - 1) * page_size;
    Page {
        items: items.iter().skip(start).take(page_size).cloned().collect(),
        page,
        total_pages,
        total_items: items.len(),
    }
}

/// Dropdown options: `all_label` followed by the distinct non-empty values
/// of `field`, in first-seen order.
pub fn facet_values<T>(items: &[T], all_label: &str, field: impl Fn(&T) -> &str) -> Vec<String> {
    let mut values = vec![all_label.to_string()];
    for item in items {
        let value = field(item);
        if !value.is_empty() && !values[1..].iter().any(|v| v == value) {
            values.push(value.to_string());
        }
    }
    values
}

/// Counter cards on the contact-us page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ContactSummary {
    pub total: usize,
    pub open: usize,
    pub pending: usize,
    pub closed: usize,
}

impl ContactSummary {
    pub fn from_messages(messages: &[ContactMessage]) -> Self {
        messages
            .iter()
            .fold(ContactSummary::default(), |mut summary, message| {
                summary.total += 1;
                match message.status {
                    ContactStatus::Open => summary.open += 1,
                    ContactStatus::Pending => summary.pending += 1,
                    ContactStatus::Closed => summary.closed += 1,
                }
                summary
            })
    }
}

/// Counter cards on the users page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UserSummary {
    pub total: usize,
    pub active: usize,
    pub verified: usize,
    pub inactive: usize,
}

impl UserSummary {
    pub fn from_users(users: &[User]) -> Self {
        UserSummary {
            total: users.len(),
            active: users.iter().filter(|u| u.user_status).count(),
            verified: users.iter().filter(|u| u.email_verification).count(),
            inactive: users.iter().filter(|u| !u.user_status).count(),
        }
    }
}
