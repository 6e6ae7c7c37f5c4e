mod test_catgenie_source;
mod test_device_api;
mod test_entry;
