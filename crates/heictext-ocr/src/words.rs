// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Domain vocabularies handed to recognisers that accept custom words.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use heictext_core::error::HeicTextError;

/// Subject areas with a curated vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    Terraform,
    Ansible,
    Aws,
    Postgresql,
    Mysql,
}

impl Domain {
    pub const ALL: [Domain; 5] = [
        Self::Terraform,
        Self::Ansible,
        Self::Aws,
        Self::Postgresql,
        Self::Mysql,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Terraform => "terraform",
            Self::Ansible => "ansible",
            Self::Aws => "aws",
            Self::Postgresql => "postgresql",
            Self::Mysql => "mysql",
        }
    }

    pub fn words(&self) -> &'static [&'static str] {
        match self {
            Self::Terraform => TERRAFORM,
            Self::Ansible => ANSIBLE,
            Self::Aws => AWS,
            Self::Postgresql => POSTGRESQL,
            Self::Mysql => MYSQL,
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Domain {
    type Err = HeicTextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "terraform" | "tf" => Ok(Self::Terraform),
            "ansible" => Ok(Self::Ansible),
            "aws" => Ok(Self::Aws),
            "postgresql" | "postgres" | "pg" => Ok(Self::Postgresql),
            "mysql" => Ok(Self::Mysql),
            other => Err(HeicTextError::Config(format!(
                "unknown custom-word domain `{other}` (expected terraform, ansible, aws, postgresql, mysql)"
            ))),
        }
    }
}

/// Parse domain names, failing on the first unknown one.
pub fn parse_domains<S: AsRef<str>>(names: &[S]) -> Result<Vec<Domain>, HeicTextError> {
    names.iter().map(|name| name.as_ref().parse()).collect()
}

/// Merged vocabulary of `domains`, first occurrence wins.
pub fn words_for_domains(domains: &[Domain]) -> Vec<String> {
    let mut seen = HashSet::new();
    domains
        .iter()
        .flat_map(|domain| domain.words().iter().copied())
        .filter(|word| seen.insert(*word))
        .map(String::from)
        .collect()
}

/// A named domain combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordPreset {
    pub name: &'static str,
    pub domains: &'static [Domain],
}

impl WordPreset {
    pub fn words(&self) -> Vec<String> {
        words_for_domains(self.domains)
    }
}

/// The best five combinations on the infrastructure-document corpus, best
/// first.
pub const PRESETS: [WordPreset; 5] = [
    WordPreset {
        name: "tf-ansible-pg",
        domains: &[Domain::Terraform, Domain::Ansible, Domain::Postgresql],
    },
    WordPreset {
        name: "tf-ansible-aws-pg",
        domains: &[Domain::Terraform, Domain::Ansible, Domain::Aws, Domain::Postgresql],
    },
    WordPreset {
        name: "tf-ansible-aws",
        domains: &[Domain::Terraform, Domain::Ansible, Domain::Aws],
    },
    WordPreset {
        name: "tf-ansible-aws-mysql",
        domains: &[Domain::Terraform, Domain::Ansible, Domain::Aws, Domain::Mysql],
    },
    WordPreset {
        name: "tf-ansible",
        domains: &[Domain::Terraform, Domain::Ansible],
    },
];

pub fn preset(name: &str) -> Option<&'static WordPreset> {
    PRESETS.iter().find(|preset| preset.name.eq_ignore_ascii_case(name))
}

const TERRAFORM: &[&str] = &[
    // core language
    "terraform", "provider", "resource", "variable", "output", "module", "data", "locals",
    "for_each", "count", "depends_on", "lifecycle", "backend", "state", "workspace",
    "environment", "configuration", "version", "required_version", "required_providers",
    "source", "lock",
    // functions
    "lookup", "merge", "keys", "values", "length", "split", "join", "replace", "substr",
    "upper", "lower", "title", "format", "formatlist", "file", "templatefile", "jsonencode",
    "yamlencode", "base64encode", "base64decode", "urlencode", "md5", "sha1", "sha256",
    "sha512", "bcrypt", "timestamp", "timeadd", "timecmp",
    // data sources
    "data_source", "aws_ami", "aws_availability_zones", "aws_caller_identity", "aws_region",
    "aws_vpc", "aws_subnet", "aws_security_group", "aws_instance", "aws_ebs_volume",
    "aws_ebs_snapshot", "aws_key_pair",
    // files
    "tf", "tfvars", "tfstate", "hcl", "json", "yaml", "yml", "toml", "tfplan",
    "tfstate.backup", "tfstate.lock.info",
];

const ANSIBLE: &[&str] = &[
    // core
    "ansible", "playbook", "inventory", "hosts", "vars", "tasks", "handlers", "roles",
    "templates", "files", "meta", "defaults", "ansible_playbook", "become", "gather_facts",
    "when", "notify", "register", "loop", "with_items", "tags",
    // modules
    "apt", "yum", "dnf", "package", "service", "systemd", "systemctl", "user", "group",
    "file", "copy", "template", "lineinfile", "replace", "command", "shell", "script", "raw",
    "fetch", "get_url", "unarchive", "archive", "cron", "mount", "filesystem", "lvg", "lvol",
    "mysql_user", "mysql_db", "postgresql_user", "postgresql_db", "postgresql_query",
    "docker_container", "docker_image", "docker_network", "docker_volume", "kubernetes",
    "k8s", "kubectl", "helm",
    // collections
    "community", "docker", "mysql", "postgresql", "aws", "azure", "gcp", "vmware", "cisco",
    // facts
    "ansible_hostname", "ansible_fqdn", "ansible_architecture", "ansible_os_family",
    "ansible_distribution", "ansible_distribution_version", "ansible_memtotal_mb",
    "ansible_processor_cores", "ansible_processor_vcpus", "ansible_default_ipv4",
    // configuration
    "ansible_cfg", "host_key_checking", "retry_files_enabled", "gathering", "fact_caching",
    "stdout_callback", "callback_plugins",
    // files
    "yml", "yaml", "json", "ini", "cfg", "conf", "j2", "jinja2",
];

const AWS: &[&str] = &[
    // core
    "aws", "amazon", "cloudformation", "cloudwatch", "cloudtrail", "cloudfront",
    // compute
    "ec2", "instance", "ami", "ebs", "snapshot", "launch_template", "autoscaling", "asg",
    "lambda", "serverless", "runtime", "layer", "eventbridge", "stepfunctions", "fargate",
    "ecs", "eks", "container", "ecr", "repository",
    // storage
    "s3", "bucket", "object", "prefix", "versioning", "glacier", "deep_archive",
    "intelligent_tiering", "distribution", "origin", "invalidation", "efs", "fsx",
    // databases
    "rds", "aurora", "mariadb", "engine", "backup", "retention", "multi_az", "replica",
    "cluster", "endpoint", "dynamodb", "table", "attribute", "partition", "gsi", "lsi",
    "elasticache", "redis", "memcached", "redshift",
    // networking
    "vpc", "subnet", "public", "private", "route_table", "route", "gateway", "internet",
    "nat", "vpn", "directconnect", "transit", "peering", "load", "balancer", "listener",
    "target", "cognito", "oidc", "saml",
    // security
    "iam", "identity", "access", "role", "policy", "statement", "effect", "action",
    "resource", "condition", "principal", "assume", "kms", "encryption", "secrets",
    "manager", "rotation", "ssm", "parameter", "session",
    // monitoring
    "logs", "log", "stream", "metric", "alarm", "threshold", "statistic", "period",
    "dashboard", "xray", "tracing", "segment",
    // governance
    "organizations", "account", "ou", "scp", "tag", "budgets", "quotas",
    // files
    "json", "yaml", "yml", "tf", "tfvars", "properties", "env",
];

const POSTGRESQL: &[&str] = &[
    // core
    "postgresql", "postgres", "psql", "database", "db", "sql", "query", "table", "column",
    "row", "schema", "index", "view", "sequence", "trigger", "function", "procedure",
    // types
    "integer", "int", "bigint", "smallint", "serial", "bigserial", "numeric", "decimal",
    "real", "double", "precision", "varchar", "char", "text", "bytea", "boolean", "date",
    "time", "timestamp", "timestamptz", "interval", "json", "jsonb", "xml", "uuid", "array",
    "enum", "cidr", "inet", "macaddr", "tsvector", "tsquery",
    // statements
    "select", "insert", "update", "delete", "create", "drop", "alter", "grant", "revoke",
    "begin", "commit", "rollback", "savepoint", "explain", "analyze", "vacuum", "reindex",
    "truncate", "copy",
    // clauses
    "from", "where", "group", "by", "having", "order", "limit", "offset", "distinct",
    "union", "intersect", "except", "with", "recursive", "inner", "left", "right", "outer",
    "join", "using", "exists", "between", "like", "ilike", "coalesce", "nullif", "cast",
    "returning", "conflict",
    // aggregates
    "count", "sum", "avg", "min", "max", "array_agg", "string_agg", "json_agg", "jsonb_agg",
    "row_number", "rank", "dense_rank", "lag", "lead",
    // administration
    "current_database", "current_user", "pg_database_size", "pg_relation_size",
    "pg_size_pretty", "postgresql_conf", "pg_hba_conf", "shared_buffers", "work_mem",
    "maintenance_work_mem", "effective_cache_size", "max_connections", "wal_level",
    "archive_mode", "hot_standby", "synchronous_commit", "log_min_duration_statement",
    "pg_stat_statements", "postgis", "uuid_ossp", "extension",
    // tools
    "pg_dump", "pg_restore", "pg_basebackup", "wal", "dump", "restore",
];

const MYSQL: &[&str] = &[
    // core
    "mysql", "mariadb", "database", "db", "sql", "query", "table", "column", "row", "schema",
    "index", "view", "trigger", "procedure", "engine", "innodb", "myisam",
    // types
    "int", "tinyint", "smallint", "mediumint", "bigint", "decimal", "float", "double",
    "bit", "char", "varchar", "binary", "varbinary", "blob", "longblob", "text",
    "mediumtext", "longtext", "enum", "set", "date", "time", "datetime", "timestamp", "year",
    "json", "geometry", "point", "polygon",
    // statements
    "select", "insert", "update", "delete", "create", "drop", "alter", "grant", "revoke",
    "commit", "rollback", "show", "describe", "explain", "optimize", "repair", "truncate",
    // clauses and functions
    "from", "where", "group", "by", "having", "order", "limit", "join", "regexp", "rlike",
    "match", "against", "ifnull", "coalesce", "date_format", "str_to_date", "date_add",
    "date_sub", "datediff", "timestampdiff", "from_unixtime", "unix_timestamp", "now",
    "curdate", "group_concat", "json_extract", "json_object", "json_array",
    // variables
    "auto_increment", "character_set_server", "collation_server", "innodb_buffer_pool_size",
    "innodb_log_file_size", "max_allowed_packet", "max_connections", "binlog_format",
    "log_bin", "server_id", "slow_query_log", "long_query_time", "sql_mode",
    "wait_timeout", "read_only", "gtid_mode",
    // tools
    "mysqldump", "mysqladmin", "mysqlcheck", "mysqlimport", "cnf", "sock",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merged_words_are_unique_and_ordered() {
        let words = words_for_domains(&[Domain::Terraform, Domain::Aws]);
        let unique: HashSet<&String> = words.iter().collect();
        assert_eq!(unique.len(), words.len());
        assert_eq!(words[0], "terraform");
        // "aws" opens the AWS list, so it directly follows the terraform words.
        let aws_pos = words.iter().position(|w| w == "aws").unwrap();
        assert_eq!(aws_pos, words_for_domains(&[Domain::Terraform]).len());
    }

    #[test]
    fn first_occurrence_wins() {
        let words = words_for_domains(&[Domain::Ansible, Domain::Terraform]);
        assert_eq!(words[0], "ansible");
        let yml = words.iter().filter(|w| *w == "yml").count();
        assert_eq!(yml, 1);
    }

    #[test]
    fn domain_parsing() {
        assert_eq!(parse_domains(&["TF", "postgres"]).unwrap(), vec![Domain::Terraform, Domain::Postgresql]);
        assert!(parse_domains(&["cobol"]).is_err());
    }

    #[test]
    fn presets_resolve() {
        let top = preset("tf-ansible-pg").unwrap();
        assert_eq!(top.domains.len(), 3);
        assert!(top.words().contains(&"playbook".to_string()));
        assert!(preset("nope").is_none());
    }

    #[test]
    fn every_domain_has_words() {
        for domain in Domain::ALL {
            assert!(!domain.words().is_empty(), "{domain}");
        }
    }
}
