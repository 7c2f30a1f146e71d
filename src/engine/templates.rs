//! Rendered file content and the dependency package list.
//!
//! This is the data the engine converges onto the host; keeping it here
//! keeps the engine modules free of site-specific text.

use std::path::Path;

use crate::config::Config;

/// Packages the stack needs before the application can run.
pub const PACKAGES: &[&str] = &[
    "apache2",
    "mysql-server",
    "php",
    "libapache2-mod-php",
    "php-mysql",
    "php-xml",
    "php-mbstring",
    "openssl",
];

pub fn http_vhost(domain: &str, docroot: &Path) -> String {
    format!(
        "<VirtualHost *:80>\n\
         \tServerName {domain}\n\
         \tDocumentRoot {docroot}\n\
         \t<Directory {docroot}>\n\
         \t\tAllowOverride All\n\
         \t\tRequire all granted\n\
         \t</Directory>\n\
         \tErrorLog ${{APACHE_LOG_DIR}}/{domain}-error.log\n\
         \tCustomLog ${{APACHE_LOG_DIR}}/{domain}-access.log combined\n\
         </VirtualHost>\n",
        docroot = docroot.display(),
    )
}

pub fn https_vhost(domain: &str, docroot: &Path, cert: &Path, key: &Path) -> String {
    format!(
        "<VirtualHost *:443>\n\
         \tServerName {domain}\n\
         \tDocumentRoot {docroot}\n\
         \tSSLEngine on\n\
         \tSSLCertificateFile {cert}\n\
         \tSSLCertificateKeyFile {key}\n\
         \t<Directory {docroot}>\n\
         \t\tAllowOverride All\n\
         \t\tRequire all granted\n\
         \t</Directory>\n\
         \tErrorLog ${{APACHE_LOG_DIR}}/{domain}-ssl-error.log\n\
         \tCustomLog ${{APACHE_LOG_DIR}}/{domain}-ssl-access.log combined\n\
         </VirtualHost>\n",
        docroot = docroot.display(),
        cert = cert.display(),
        key = key.display(),
    )
}

/// Application database settings file. Contains the credential; callers must
/// never copy this text into facts or logs.
pub fn app_db_config(config: &Config) -> String {
    format!(
        "<?php\n\
         define('DB_HOST', 'localhost');\n\
         define('DB_NAME', '{}');\n\
         define('DB_USER', '{}');\n\
         define('DB_PASSWORD', '{}');\n",
        config.db_name, config.db_user, config.db_password,
    )
}

/// Needle identifying a rendered app config for the given database; probing
/// against this line avoids matching on the credential.
pub fn app_db_config_marker(config: &Config) -> String {
    format!("define('DB_NAME', '{}')", config.db_name)
}
