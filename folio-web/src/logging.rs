//! 浏览器控制台日志
//!
//! `tracing-subscriber` 的 fmt 层把每条格式化好的日志交给 [`ConsoleWriter`]，
//! 写入器在 drop 时按级别转发到 `gloo::console`。
//! 级别在读取配置之后才确定，所以最外层是一个可重载的 [`LevelFilter`]。

use std::io;

use tracing::{Level, Metadata, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::reload;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::Registry;

/// 运行时调整日志级别的句柄
pub struct LogLevel {
    handle: reload::Handle<LevelFilter, Registry>,
}

impl LogLevel {
    /// 按配置调整级别；无法识别的级别保持不变
    pub fn set(&self, name: &str) {
        let Ok(filter) = name.parse::<LevelFilter>() else {
            tracing::warn!(log_level = name, "无法识别的日志级别");
            return;
        };
        if let Err(e) = self.handle.reload(filter) {
            tracing::warn!(error = %e, "日志级别更新失败");
        }
    }

    pub fn current(&self) -> Option<LevelFilter> {
        self.handle.clone_current()
    }
}

/// 安装全局订阅者（默认 info 级别）
///
/// 已经有全局订阅者时返回错误，由调用方决定如何报告。
pub fn init() -> Result<LogLevel, TryInitError> {
    let (subscriber, level) = subscriber();
    subscriber.try_init()?;
    Ok(level)
}

fn subscriber() -> (impl Subscriber + Send + Sync + 'static, LogLevel) {
    let (filter, handle) = reload::Layer::new(LevelFilter::INFO);
    let fmt = tracing_subscriber::fmt::layer()
        .with_writer(ConsoleMakeWriter)
        .without_time()
        .with_ansi(false)
        .with_target(false);
    let subscriber = tracing_subscriber::registry().with(filter).with(fmt);
    (subscriber, LogLevel { handle })
}

struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(*meta.level())
    }
}

/// 缓冲一条日志，drop 时输出
pub struct ConsoleWriter {
    level: Level,
    buffer: Vec<u8>,
}

impl ConsoleWriter {
    fn new(level: Level) -> Self {
        Self {
            level,
            buffer: Vec::new(),
        }
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let line = String::from_utf8_lossy(&self.buffer);
        let message = line.trim_end();
        match self.level {
            Level::ERROR => gloo::console::error!(message),
            Level::WARN => gloo::console::warn!(message),
            Level::INFO => gloo::console::info!(message),
            _ => gloo::console::debug!(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_reloads_at_runtime() {
        let (_subscriber, level) = subscriber();
        assert_eq!(level.current(), Some(LevelFilter::INFO));

        level.set("debug");
        assert_eq!(level.current(), Some(LevelFilter::DEBUG));

        // 无法识别的级别不改变当前值
        level.set("loud");
        assert_eq!(level.current(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_level_after_subscriber_dropped() {
        let (subscriber, level) = subscriber();
        drop(subscriber);
        level.set("trace");
        assert_eq!(level.current(), None);
    }
}
