//! Slice 分页：offset/limit + "多取一条" 判断是否有下一页

use serde::Serialize;

use crate::errors::{ModoosError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// 单个排序项，property 为客户端传入的字段名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    pub property: String,
    pub direction: Direction,
}

impl SortOrder {
    pub fn asc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: Direction::Desc,
        }
    }

    /// 解析 "createdAt,desc" / "title" 形式
    pub fn parse(raw: &str) -> Result<Self> {
        let mut parts = raw.split(',').map(str::trim);
        let property = parts.next().filter(|p| !p.is_empty()).ok_or_else(|| {
            ModoosError::validation(format!("Invalid sort expression: '{}'", raw))
        })?;

        let direction = match parts.next().map(str::to_ascii_lowercase).as_deref() {
            None | Some("") | Some("asc") => Direction::Asc,
            Some("desc") => Direction::Desc,
            Some(other) => {
                return Err(ModoosError::validation(format!(
                    "Invalid sort direction '{}', expected asc or desc",
                    other
                )));
            }
        };

        Ok(Self {
            property: property.to_string(),
            direction,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pageable {
    /// 从 0 开始
    pub page: u64,
    pub size: u64,
    pub sort: Vec<SortOrder>,
}

impl Pageable {
    pub fn new(page: u64, size: u64) -> Self {
        Self {
            page,
            size: size.max(1),
            sort: Vec::new(),
        }
    }

    pub fn with_sort(mut self, order: SortOrder) -> Self {
        self.sort.push(order);
        self
    }

    /// 数据库驱动按 i64 绑定，超出部分截断到 i64::MAX
    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size).min(i64::MAX as u64)
    }
}

/// 不带总数的分页结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Slice<T> {
    pub content: Vec<T>,
    pub page: u64,
    pub size: u64,
    pub number_of_elements: usize,
    pub has_next: bool,
    pub first: bool,
    pub last: bool,
    pub empty: bool,
}

impl<T> Slice<T> {
    /// `rows` 最多为 size + 1 条，多出的那一条只用来判断 has_next
    pub fn from_overfetched(mut rows: Vec<T>, pageable: &Pageable) -> Self {
        let size = pageable.size as usize;
        let has_next = rows.len() > size;
        rows.truncate(size);

        Self {
            number_of_elements: rows.len(),
            empty: rows.is_empty(),
            content: rows,
            page: pageable.page,
            size: pageable.size,
            has_next,
            first: pageable.page == 0,
            last: !has_next,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Slice<U> {
        Slice {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            number_of_elements: self.number_of_elements,
            has_next: self.has_next,
            first: self.first,
            last: self.last,
            empty: self.empty,
        }
    }
}
