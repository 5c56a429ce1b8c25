//! Run configuration: feed tables, keyword table and numeric tunables.
//!
//! [`AppConfig::default`] carries the built-in tables. A YAML file passed with
//! `--config` replaces any top-level field it names; omitted fields keep their
//! defaults. The resulting value is built once in `main` and passed by
//! reference to the stages that need it.
//!
//! ```yaml
//! tunables:
//!   workers: 4
//!   request_timeout_secs: 5
//! international_sources:
//!   - name: NPR
//!     url: https://feeds.npr.org/1001/rss.xml
//! keywords:
//!   sports: [football, tennis, 足球]
//! ```

use crate::error::ConfigError;
use crate::models::{Category, Source};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

/// Ordered keyword lists per category. The fallback category has no entry.
pub type KeywordTable = BTreeMap<Category, Vec<String>>;

/// Numeric knobs for the aggregation run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Tunables {
    /// Maximum number of feeds fetched at once.
    pub workers: usize,
    /// Per-request HTTP timeout.
    pub request_timeout_secs: u64,
    /// How long the scheduler waits on one task before counting it failed.
    pub harvest_timeout_secs: u64,
    /// Only the first N entries of each feed are considered.
    pub max_items_per_source: usize,
    /// Items per category printed to the console.
    pub max_display_count: usize,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            workers: 8,
            request_timeout_secs: 8,
            harvest_timeout_secs: 10,
            max_items_per_source: 15,
            max_display_count: 15,
        }
    }
}

impl Tunables {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn harvest_timeout(&self) -> Duration {
        Duration::from_secs(self.harvest_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub tunables: Tunables,
    pub domestic_sources: Vec<Source>,
    pub international_sources: Vec<Source>,
    pub keywords: KeywordTable,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tunables: Tunables::default(),
            domestic_sources: default_domestic_sources(),
            international_sources: default_international_sources(),
            keywords: default_keywords(),
        }
    }
}

impl AppConfig {
    /// Load the configuration, starting from the built-in defaults.
    ///
    /// With `path == None` the defaults are used as-is. Either way the result
    /// is normalized. It is not validated here: command-line overrides still
    /// have to be applied, so callers run [`AppConfig::validate`] afterwards.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Read`] if the file cannot be read and
    /// [`ConfigError::Yaml`] if it is not valid YAML for this schema.
    #[instrument(level = "info")]
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_string(),
                    source,
                })?;
                let config = Self::from_yaml(&text).map_err(|source| ConfigError::Yaml {
                    path: path.to_string(),
                    source,
                })?;
                info!(path, "Loaded configuration file");
                config
            }
            None => {
                debug!("Using built-in configuration");
                Self::default()
            }
        };
        Ok(config.normalized())
    }

    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    /// Trim keywords, drop empty ones and any list configured for the
    /// fallback category.
    pub fn normalized(mut self) -> Self {
        self.keywords.remove(&Category::Other);
        for keywords in self.keywords.values_mut() {
            *keywords = keywords
                .iter()
                .map(|k| k.trim())
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .collect();
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.tunables;
        if t.workers == 0 {
            return Err(ConfigError::ZeroTunable("workers"));
        }
        if t.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTunable("request_timeout_secs"));
        }
        if t.harvest_timeout_secs == 0 {
            return Err(ConfigError::ZeroTunable("harvest_timeout_secs"));
        }
        if t.max_items_per_source == 0 {
            return Err(ConfigError::ZeroTunable("max_items_per_source"));
        }

        let mut names = HashSet::new();
        let mut any = false;
        for source in self.sources() {
            any = true;
            Url::parse(&source.url).map_err(|e| ConfigError::InvalidUrl {
                name: source.name.clone(),
                url: source.url.clone(),
                source: e,
            })?;
            if !names.insert(source.name.as_str()) {
                return Err(ConfigError::DuplicateSource(source.name.clone()));
            }
        }
        if !any {
            return Err(ConfigError::NoSources);
        }
        Ok(())
    }

    /// The working set: domestic sources followed by international ones.
    pub fn sources(&self) -> impl Iterator<Item = &Source> {
        self.domestic_sources
            .iter()
            .chain(self.international_sources.iter())
    }

    pub fn source_list(&self) -> Vec<Source> {
        self.sources().cloned().collect()
    }
}

fn sources(table: &[(&str, &str)]) -> Vec<Source> {
    table.iter().map(|(name, url)| Source::new(name, url)).collect()
}

fn default_domestic_sources() -> Vec<Source> {
    sources(&[
        ("澎湃新闻", "https://www.thepaper.cn/feed_channel_25951"),
        ("新浪新闻", "https://news.sina.com.cn/roll"),
        ("网易新闻", "https://www.163.com/news/rss"),
        ("腾讯新闻", "https://news.qq.com/newsgn/rss_newsgn.xml"),
        ("人民网", "http://www.people.com.cn/rss/politics.xml"),
        ("新华网", "http://www.xinhuanet.com/rss.xml"),
        ("央视新闻", "https://rss.cctv.com/rss/cctvnews.xml"),
        ("观察者网", "https://www.guancha.cn/rss"),
        ("36氪", "https://36kr.com/feed"),
        ("虎嗅", "https://www.huxiu.com/rss/1.xml"),
    ])
}

fn default_international_sources() -> Vec<Source> {
    sources(&[
        ("BBC中文", "https://feeds.bbci.co.uk/zhongwen/simp/rss.xml"),
        ("BBC News", "https://feeds.bbci.co.uk/news/rss.xml"),
        ("BBC Technology", "https://feeds.bbci.co.uk/news/technology/rss.xml"),
        ("CNN", "http://rss.cnn.com/rss/edition.rss"),
        ("CNN Technology", "http://rss.cnn.com/rss/edition_technology.rss"),
        ("Reuters", "https://www.reuters.com/rssFeed/worldNews"),
        ("Reuters Technology", "https://www.reuters.com/rssFeed/technologyNews"),
        ("TechCrunch", "https://techcrunch.com/feed/"),
        ("The Guardian", "https://www.theguardian.com/world/rss"),
        ("NY Times", "https://rss.nytimes.com/services/xml/rss/nyt/World.xml"),
        ("WSJ", "https://feeds.a.dj.com/rss/RSSWorldNews.xml"),
        ("NPR", "https://feeds.npr.org/1001/rss.xml"),
    ])
}

fn default_keywords() -> KeywordTable {
    let table: [(Category, &[&str]); 9] = [
        (
            Category::Ai,
            &[
                "AI", "人工智能", "GPT", "LLM", "大模型", "机器学习", "深度学习", "神经网络",
                "自然语言处理", "NLP", "计算机视觉", "ChatGPT", "OpenAI",
                "artificial intelligence", "machine learning", "deep learning",
                "neural network", "AI Lab", "AI智能",
            ],
        ),
        (
            Category::Tech,
            &[
                "科技", "技术", "创新", "互联网", "5G", "6G", "芯片", "半导体", "电子", "数字化",
                "智能", "Tech", "technology", "innovation", "digital", "startup", "卫星", "通信",
                "software", "hardware",
            ],
        ),
        (
            Category::Finance,
            &[
                "金融", "经济", "股市", "投资", "基金", "债券", "货币", "银行", "利率", "通胀",
                "通货膨胀", "降息", "加息", "融资", "finance", "economy", "stock", "market",
                "investment", "funding", "IPO",
            ],
        ),
        (
            Category::Education,
            &[
                "教育", "学校", "大学", "高校", "学生", "教师", "课程", "学习", "培训", "考试",
                "教学", "education", "university", "school", "college",
            ],
        ),
        (
            Category::Policy,
            &[
                "政策", "法规", "条例", "规定", "文件", "通知", "决定", "实施", "颁布", "发布",
                "国务院", "部委", "监管", "立法", "法律", "policy", "regulation", "law",
                "government",
            ],
        ),
        (
            Category::Entertainment,
            &[
                "娱乐", "明星", "电影", "电视剧", "综艺", "音乐", "演唱会", "艺人", "导演", "演员",
                "歌手", "网红", "剧集", "票房", "流量", "entertainment", "movie", "film", "music",
                "celebrity", "TV",
            ],
        ),
        (
            Category::International,
            &[
                "国际", "外交", "贸易", "战争", "冲突", "和平", "联合国", "国际关系", "乌克兰",
                "Russia", "Ukraine", "Trump", "Zelensky", "international", "diplomacy",
                "trade war", "war", "conflict", "peace", "election", "Myanmar",
            ],
        ),
        (
            Category::Society,
            &[
                "社会", "民生", "就业", "医疗", "健康", "养老", "住房", "交通", "环境", "环保",
                "society", "health", "employment", "environment", "hospital", "care", "wellness",
            ],
        ),
        (
            Category::Sports,
            &[
                "体育", "足球", "篮球", "奥运", "比赛", "运动", "sport", "football", "basketball",
                "olympic", "game", "tennis", "defeats",
            ],
        ),
    ];

    table
        .into_iter()
        .map(|(category, words)| (category, words.iter().map(|w| w.to_string()).collect()))
        .collect()
}
