//! # Panic 兜底
//!
//! 进程级最后一道防线：处理器内未被捕获的 panic 由 `CatchPanicLayer` 拦截，
//! 转换为携带 `{error, message, stack}` 的 500 响应。并非主要错误路径。

use std::any::Any;
use std::backtrace::Backtrace;
use std::cell::RefCell;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::types::ApiErrorResponse;

thread_local! {
    /// 最近一次 panic 的调用栈，由 panic hook 写入、`handle_panic` 取走
    static LAST_PANIC_TRACE: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// # Summary
/// 安装进程级 panic hook。
///
/// # Logic
/// 1. panic 发生时在当前线程捕获完整调用栈，写入线程局部槽位。
/// 2. 通过 tracing 记录 panic 信息。
///
/// `CatchPanicLayer` 在同一线程、同一次 poll 中调用 `handle_panic`，因此可以取回该调用栈。
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let trace = Backtrace::force_capture().to_string();
        tracing::error!("Unhandled panic: {}", info);
        LAST_PANIC_TRACE.with(|slot| *slot.borrow_mut() = Some(trace));
    }));
}

/// 取出 panic 负载中的文本
fn panic_message(err: &(dyn Any + Send)) -> String {
    if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "Unknown panic payload".to_string()
    }
}

/// # Summary
/// `CatchPanicLayer` 的响应构造器。
///
/// # Logic
/// 1. 提取 panic 文本作为 `message`。
/// 2. 优先使用 hook 留下的调用栈；未安装 hook 时退化为当前位置的调用栈。
///
/// # Returns
/// 500 响应，body 为 `{error, message, stack}`。
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic_message(err.as_ref());
    let stack = LAST_PANIC_TRACE
        .with(|slot| slot.borrow_mut().take())
        .unwrap_or_else(|| Backtrace::force_capture().to_string());

    let body = ApiErrorResponse::from_msg("Internal Server Error")
        .with_message(message)
        .with_stack(stack);
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
