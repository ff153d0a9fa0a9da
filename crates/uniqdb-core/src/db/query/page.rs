use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// OrderDirection
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum OrderDirection {
    #[default]
    #[display("ASC")]
    Asc,
    #[display("DESC")]
    Desc,
}

///
/// NullHandling
///
/// Native leaves null placement to the store.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum NullHandling {
    #[default]
    Native,
    NullsFirst,
    NullsLast,
}

///
/// Order
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Order {
    field: String,
    direction: OrderDirection,
    nulls: NullHandling,
}

impl Order {
    #[must_use]
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: OrderDirection::Asc,
            nulls: NullHandling::Native,
        }
    }

    #[must_use]
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            direction: OrderDirection::Desc,
            ..Self::asc(field)
        }
    }

    #[must_use]
    pub fn nulls_first(mut self) -> Self {
        self.nulls = NullHandling::NullsFirst;
        self
    }

    #[must_use]
    pub fn nulls_last(mut self) -> Self {
        self.nulls = NullHandling::NullsLast;
        self
    }

    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    #[must_use]
    pub const fn direction(&self) -> OrderDirection {
        self.direction
    }

    fn render(&self) -> String {
        let nulls = match self.nulls {
            NullHandling::Native => "",
            NullHandling::NullsFirst => " NULLS FIRST",
            NullHandling::NullsLast => " NULLS LAST",
        };

        format!("{} {}{nulls}", self.field, self.direction)
    }
}

///
/// Sort
///
/// Ordered list of sort keys; empty means unsorted.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Sort {
    orders: Vec<Order>,
}

impl Sort {
    #[must_use]
    pub const fn unsorted() -> Self {
        Self { orders: Vec::new() }
    }

    /// Ascending sort on one field.
    #[must_use]
    pub fn by(field: impl Into<String>) -> Self {
        Self {
            orders: vec![Order::asc(field)],
        }
    }

    #[must_use]
    pub fn from_orders(orders: impl IntoIterator<Item = Order>) -> Self {
        Self {
            orders: orders.into_iter().collect(),
        }
    }

    /// Flip every order to descending.
    #[must_use]
    pub fn descending(mut self) -> Self {
        for order in &mut self.orders {
            order.direction = OrderDirection::Desc;
        }
        self
    }

    /// Flip every order to ascending.
    #[must_use]
    pub fn ascending(mut self) -> Self {
        for order in &mut self.orders {
            order.direction = OrderDirection::Asc;
        }
        self
    }

    #[must_use]
    pub fn and(mut self, other: Self) -> Self {
        self.orders.extend(other.orders);
        self
    }

    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    #[must_use]
    pub fn is_unsorted(&self) -> bool {
        self.orders.is_empty()
    }

    /// ` ORDER BY a ASC, b DESC`, or nothing when unsorted.
    pub(crate) fn render(&self) -> String {
        if self.orders.is_empty() {
            return String::new();
        }

        let orders: Vec<String> = self.orders.iter().map(Order::render).collect();
        format!(" ORDER BY {}", orders.join(", "))
    }
}

///
/// PageRequest
///
/// Zero-based page number plus page size.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PageRequest {
    page: u32,
    size: u32,
    sort: Sort,
}

impl PageRequest {
    #[must_use]
    pub const fn of(page: u32, size: u32) -> Self {
        Self {
            page,
            size,
            sort: Sort::unsorted(),
        }
    }

    #[must_use]
    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    #[must_use]
    pub const fn sort(&self) -> &Sort {
        &self.sort
    }

    /// Row offset of this page: page × size.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.page as u64 * self.size as u64
    }

    /// The following page with the same size and sort.
    #[must_use]
    pub fn next(&self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            ..self.clone()
        }
    }
}

///
/// Pageable
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum Pageable {
    #[default]
    Unpaged,
    Paged(PageRequest),
}

impl Pageable {
    #[must_use]
    pub const fn is_paged(&self) -> bool {
        matches!(self, Self::Paged(_))
    }

    #[must_use]
    pub const fn request(&self) -> Option<&PageRequest> {
        match self {
            Self::Paged(request) => Some(request),
            Self::Unpaged => None,
        }
    }

    #[must_use]
    pub const fn offset(&self) -> u64 {
        match self {
            Self::Paged(request) => request.offset(),
            Self::Unpaged => 0,
        }
    }

    /// ` ORDER BY … LIMIT n OFFSET m`, or nothing when unpaged.
    pub(crate) fn render(&self) -> String {
        match self {
            Self::Unpaged => String::new(),
            Self::Paged(request) => format!(
                "{} LIMIT {} OFFSET {}",
                request.sort.render(),
                request.size,
                request.offset()
            ),
        }
    }
}

impl From<PageRequest> for Pageable {
    fn from(request: PageRequest) -> Self {
        Self::Paged(request)
    }
}

///
/// Page
///
/// One page of results plus the total element count across all pages.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Page<E> {
    content: Vec<E>,
    pageable: Pageable,
    total: u64,
}

impl<E> Page<E> {
    /// Build a page; a non-empty last page corrects an understated total
    /// to `offset + content.len()`.
    #[must_use]
    pub fn new(content: Vec<E>, pageable: Pageable, total: u64) -> Self {
        let len = content.len() as u64;
        let total = match &pageable {
            Pageable::Paged(request)
                if len > 0 && request.offset() + u64::from(request.size) > total =>
            {
                request.offset() + len
            }
            _ => total,
        };

        Self {
            content,
            pageable,
            total,
        }
    }

    /// A single page holding the entire result.
    #[must_use]
    pub fn unpaged(content: Vec<E>) -> Self {
        let total = content.len() as u64;

        Self {
            content,
            pageable: Pageable::Unpaged,
            total,
        }
    }

    #[must_use]
    pub fn content(&self) -> &[E] {
        &self.content
    }

    #[must_use]
    pub fn into_content(self) -> Vec<E> {
        self.content
    }

    #[must_use]
    pub const fn pageable(&self) -> &Pageable {
        &self.pageable
    }

    #[must_use]
    pub const fn total_elements(&self) -> u64 {
        self.total
    }

    #[must_use]
    pub fn number_of_elements(&self) -> usize {
        self.content.len()
    }

    #[must_use]
    pub fn total_pages(&self) -> u64 {
        match &self.pageable {
            Pageable::Paged(request) if request.size > 0 => {
                self.total.div_ceil(u64::from(request.size))
            }
            _ => 1,
        }
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        match &self.pageable {
            Pageable::Paged(request) => u64::from(request.page) + 1 >= self.total_pages(),
            Pageable::Unpaged => true,
        }
    }
}
