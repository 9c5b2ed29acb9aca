pub mod esp8266;
