//! # 响应解析
//!
//! ## 实现思路
//!
//! - 成功（2xx）：JSON 数组，每一行可以是字符串，也可以是单字符字符串数组。
//! - 失败：优先取 `{ "error": "..." }`，否则回退为 `HTTP <status>`。
//! - 成功状态码但正文无法解析视为 `MalformedResponse`，编排器照常回到 Idle。

use bytes::Bytes;
use serde::Deserialize;

use super::RequestError;

/// 转换结果：字符行组成的网格。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputGrid {
    rows: Vec<Vec<char>>,
}

impl OutputGrid {
    pub fn new(rows: Vec<Vec<char>>) -> Self {
        Self { rows }
    }

    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(
            lines
                .into_iter()
                .map(|line| line.as_ref().chars().collect())
                .collect(),
        )
    }

    pub fn rows(&self) -> &[Vec<char>] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 纯文本转写：每行字符拼接，行之间以 `\n` 连接，末尾不补换行。
    ///
    /// # 示例
    /// ```rust
    /// use asciify::submission::OutputGrid;
    ///
    /// let grid = OutputGrid::from_lines(["ab", "cd"]);
    /// assert_eq!(grid.transcript(), "ab\ncd");
    /// ```
    pub fn transcript(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRow {
    Text(String),
    Cells(Vec<String>),
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// 服务端原始回复。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceReply {
    pub status: u16,
    pub body: Bytes,
}

impl ServiceReply {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 按状态码解析为网格或服务端错误。
    pub fn into_grid(self) -> Result<OutputGrid, RequestError> {
        if !self.is_success() {
            return Err(RequestError::Server {
                status: self.status,
                message: parse_error_message(self.status, &self.body),
            });
        }
        parse_grid(&self.body)
    }
}

/// 解析成功响应正文。
pub fn parse_grid(body: &[u8]) -> Result<OutputGrid, RequestError> {
    let raw: Vec<RawRow> = serde_json::from_slice(body)
        .map_err(|e| RequestError::MalformedResponse(e.to_string()))?;

    let mut rows = Vec::with_capacity(raw.len());
    for (index, row) in raw.into_iter().enumerate() {
        match row {
            RawRow::Text(text) => rows.push(text.chars().collect()),
            RawRow::Cells(cells) => {
                let mut chars = Vec::with_capacity(cells.len());
                for cell in cells {
                    let mut iter = cell.chars();
                    match (iter.next(), iter.next()) {
                        (Some(c), None) => chars.push(c),
                        _ => {
                            return Err(RequestError::MalformedResponse(format!(
                                "row {} contains cell {:?}, expected a single character",
                                index, cell
                            )));
                        }
                    }
                }
                rows.push(chars);
            }
        }
    }

    Ok(OutputGrid::new(rows))
}

/// 提取失败响应中的错误消息。
pub fn parse_error_message(status: u16, body: &[u8]) -> String {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(parsed) if !parsed.error.trim().is_empty() => parsed.error,
        _ => format!("HTTP {}", status),
    }
}
