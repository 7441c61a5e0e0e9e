mod byte_order_tests;
mod handle_tests;
