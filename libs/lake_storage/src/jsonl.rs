use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use crate::StorageError;

/// How a fetched batch body is decoded. Selected once per call by
/// [`DecodeStrategy::for_key`], not discovered by catching decode failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStrategy {
    /// One JSON document per line, decoded incrementally with bounded
    /// memory. Blank and malformed lines are skipped.
    Streaming,
    /// Whole body buffered and decoded as a whitespace-separated stream of
    /// JSON values; decoding stops at the first malformed value.
    Buffered,
}

impl DecodeStrategy {
    /// Batches written by this pipeline always carry the `.jsonl` suffix and
    /// stream line by line; anything else falls back to buffered decode.
    pub fn for_key(key: &str) -> Self {
        if key.ends_with(".jsonl") {
            DecodeStrategy::Streaming
        } else {
            DecodeStrategy::Buffered
        }
    }
}

/// Forward-only reader over a line-delimited JSON body.
pub struct JsonlStream<R> {
    inner: Inner<R>,
}

enum Inner<R> {
    Streaming { reader: R, line: String },
    Buffered(std::vec::IntoIter<Value>),
}

impl<R: AsyncBufRead + Unpin> JsonlStream<R> {
    pub async fn open(mut reader: R, strategy: DecodeStrategy) -> Result<Self, StorageError> {
        let inner = match strategy {
            DecodeStrategy::Streaming => Inner::Streaming {
                reader,
                line: String::new(),
            },
            DecodeStrategy::Buffered => {
                let mut buf = Vec::new();
                reader.read_to_end(&mut buf).await?;
                let mut values = Vec::new();
                for item in serde_json::Deserializer::from_slice(&buf).into_iter::<Value>() {
                    match item {
                        Ok(value) => values.push(value),
                        Err(_) => break,
                    }
                }
                Inner::Buffered(values.into_iter())
            }
        };
        Ok(Self { inner })
    }

    /// Next decoded record, or `None` at end of body. Order is preserved.
    pub async fn next_record(&mut self) -> Result<Option<Value>, StorageError> {
        match &mut self.inner {
            Inner::Streaming { reader, line } => loop {
                line.clear();
                let read = reader.read_line(line).await?;
                if read == 0 {
                    return Ok(None);
                }
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                // Malformed lines are skipped: the ids recovered here feed
                // sampling, not settlement.
                match serde_json::from_str(trimmed) {
                    Ok(value) => return Ok(Some(value)),
                    Err(_) => continue,
                }
            },
            Inner::Buffered(values) => Ok(values.next()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn collect(body: &[u8], strategy: DecodeStrategy) -> Vec<Value> {
        let mut stream = JsonlStream::open(body, strategy).await.unwrap();
        let mut out = Vec::new();
        while let Some(record) = stream.next_record().await.unwrap() {
            out.push(record);
        }
        out
    }

    #[tokio::test]
    async fn streaming_skips_blank_lines_and_keeps_order() {
        let body = b"{\"id\":1}\n\n{\"id\":2}\n{\"id\":3}\n";
        let records = collect(body, DecodeStrategy::Streaming).await;
        assert_eq!(records.len(), 3);
        let ids: Vec<i64> = records.iter().map(|r| r["id"].as_i64().unwrap()).collect();
        assert_eq!(ids, [1, 2, 3]);
    }

    #[tokio::test]
    async fn streaming_skips_malformed_lines() {
        let body = b"{\"id\":1}\nnot-json\n{\"id\":2}\n";
        let records = collect(body, DecodeStrategy::Streaming).await;
        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn buffered_decodes_value_stream() {
        let body = b"{\"id\":1} {\"id\":2}\n{\"id\":3}";
        let records = collect(body, DecodeStrategy::Buffered).await;
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn strategy_selection_is_by_key_suffix() {
        assert_eq!(
            DecodeStrategy::for_key("accounts/accounts_20250101000000.jsonl"),
            DecodeStrategy::Streaming
        );
        assert_eq!(DecodeStrategy::for_key("accounts/export.json"), DecodeStrategy::Buffered);
    }
}
