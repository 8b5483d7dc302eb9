
mod relation_test;
mod router_test;
mod shopping_list_test;
mod subscription_test;
mod user_test;
