mod middleware_test;
mod reservation_test;
mod store_test;
mod test_utils;
