use std::{fmt::Debug, sync::Mutex};

use tokio::time::Instant;

/// Call-recording test double. Every call is stored with the tokio instant it
/// happened at, so tests running on a paused clock can assert on timing.
pub struct Mock<OUTPUT: Send + Sync, INPUT: Send + Sync = ()>
where
    INPUT: Clone,
{
    executor: Box<dyn Fn(INPUT) -> OUTPUT + Sync + Send>,
    calls: Mutex<Vec<(Instant, INPUT)>>,
}

impl<OUTPUT: Send + Sync, INPUT: Clone + Send + Sync> Default for Mock<OUTPUT, INPUT> {
    fn default() -> Self {
        Self::new()
    }
}

impl<OUTPUT: Send + Sync, INPUT: Clone + Send + Sync> Mock<OUTPUT, INPUT> {
    pub fn new() -> Self {
        Self {
            executor: Box::new(|_| panic!("Mock executor not set")),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn default_output(self) -> Self
    where
        OUTPUT: Default,
    {
        Self {
            executor: Box::new(|_| OUTPUT::default()),
            calls: self.calls,
        }
    }

    pub fn fake<T>(self, fake: T) -> Self
    where
        T: Fn(INPUT) -> OUTPUT + Send + Sync + 'static,
    {
        Self {
            executor: Box::new(fake),
            calls: self.calls,
        }
    }

    pub fn new_returning_default() -> Self
    where
        OUTPUT: Default,
    {
        Self::new().default_output()
    }

    pub fn new_fake<T>(fake: T) -> Self
    where
        T: Fn(INPUT) -> OUTPUT + Send + Sync + 'static,
    {
        Self::new().fake(fake)
    }

    pub fn call(&self, input: INPUT) -> OUTPUT {
        self.calls
            .lock()
            .unwrap()
            .push((Instant::now(), input.clone()));
        (self.executor)(input)
    }

    pub fn get_calls(&self) -> Vec<INPUT> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, input)| input.clone())
            .collect()
    }

    pub fn get_calls_with_time(&self) -> Vec<(Instant, INPUT)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn assert_called_times(&self, times: usize) {
        assert_eq!(self.call_count(), times);
    }

    pub fn assert_not_called(&self) {
        assert_eq!(self.call_count(), 0, "Expected no calls");
    }

    pub fn assert_nth_call(&self, n: usize, expected: INPUT)
    where
        INPUT: PartialEq + Debug,
    {
        let calls = self.get_calls();
        match calls.get(n) {
            Some(actual) => assert_eq!(actual, &expected),
            None => panic!("Expected call #{n} but only {} calls made", calls.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_must_return_default_output() {
        let mock: Mock<u32> = Mock::new_returning_default();
        assert_eq!(mock.call(()), 0);
    }

    #[test]
    fn it_must_forward_input_to_fake() {
        let mock: Mock<u32, u32> = Mock::new_fake(|a| a * 2);
        assert_eq!(mock.call(21), 42);
    }

    #[test]
    fn it_must_record_calls_in_order() {
        let mock: Mock<(), u32> = Mock::new_returning_default();
        mock.call(3);
        mock.call(1);
        mock.call(2);
        assert_eq!(mock.get_calls(), vec![3, 1, 2]);
        mock.assert_nth_call(1, 1);
    }

    #[test]
    #[should_panic(expected = "Mock executor not set")]
    fn it_must_panic_without_executor() {
        let mock: Mock<u32> = Mock::new();
        mock.call(());
    }

    #[test]
    #[should_panic(expected = "only 1 calls made")]
    fn it_must_panic_when_nth_call_is_missing() {
        let mock: Mock<(), u32> = Mock::new_returning_default();
        mock.call(1);
        mock.assert_nth_call(1, 1);
    }
}
