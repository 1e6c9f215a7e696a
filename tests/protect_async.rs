use faultline::inject::Injector;
use faultline::logger::BufferLogger;
use faultline::logger::Logger;
use faultline::recover::Controller;
use std::sync::Arc;
use tokio::task;

async fn explode() -> u32 {
  task::yield_now().await;
  panic!("async boom")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn protect_async_recovers_on_the_polling_thread() {
  let logger: Arc<BufferLogger> = Arc::new(BufferLogger::new());
  let injector: Injector = Injector::new();

  injector.register("logger", Arc::clone(&logger) as Arc<dyn Logger>);

  let controller: Arc<Controller> = Controller::shared(&injector);

  assert_eq!(controller.protect_async(true, async { 7 }).await, Some(7));
  assert!(logger.lines().is_empty());

  let output: Option<u32> = tokio::spawn(controller.protect_async(true, explode()))
    .await
    .unwrap();

  assert_eq!(output, None);

  let lines: Vec<String> = logger.lines();

  assert_eq!(lines[0], "PANIC: async boom");
  assert_eq!(lines[1], "----------------------[ Stack trace begin ]-----------------------");
  assert_eq!(lines[lines.len() - 1], "-----------------------[ Stack trace end ]------------------------");
}
