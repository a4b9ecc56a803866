use std::str::FromStr;

use anyhow::anyhow;

/// Tag applied when no commit hash is available, and as the
/// mutable alias alongside every immutable build tag.
pub const LATEST_TAG: &str = "latest";

/// Length of the commit-derived image tag.
const SHORT_HASH_LEN: usize = 7;

/// A fully qualified image reference: repository URI plus tag.
/// Every build produces exactly one immutable commit-tagged
/// reference, plus the moving [LATEST_TAG] alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
  pub repository: String,
  pub tag: String,
}

impl ImageReference {
  /// Reference the mutable `latest` alias of a repository.
  pub fn latest(repository: impl Into<String>) -> ImageReference {
    ImageReference {
      repository: repository.into(),
      tag: LATEST_TAG.to_string(),
    }
  }

  /// Tag a repository with the short (7 character) commit hash,
  /// falling back to `latest` when no commit is available.
  pub fn from_commit(
    repository: impl Into<String>,
    commit: Option<&str>,
  ) -> ImageReference {
    let tag = match commit {
      Some(hash) if !hash.is_empty() => {
        hash.chars().take(SHORT_HASH_LEN).collect()
      }
      _ => LATEST_TAG.to_string(),
    };
    ImageReference {
      repository: repository.into(),
      tag,
    }
  }

  pub fn uri(&self) -> String {
    format!("{}:{}", self.repository, self.tag)
  }
}

impl std::fmt::Display for ImageReference {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    write!(f, "{}:{}", self.repository, self.tag)
  }
}

impl FromStr for ImageReference {
  type Err = anyhow::Error;

  /// Parses `repository[:tag]`. A colon only separates the tag
  /// when it comes after the last `/`, so registry ports
  /// (`registry:5000/app`) parse as part of the repository.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    if s.is_empty() {
      return Err(anyhow!("image reference cannot be empty"));
    }
    let tag_sep = s.rfind(':').filter(|colon| {
      match s.rfind('/') {
        Some(slash) => *colon > slash,
        None => true,
      }
    });
    let reference = match tag_sep {
      Some(colon) => ImageReference {
        repository: s[..colon].to_string(),
        tag: s[colon + 1..].to_string(),
      },
      None => ImageReference::latest(s),
    };
    if reference.repository.is_empty() {
      return Err(anyhow!(
        "image reference '{s}' has no repository"
      ));
    }
    if reference.tag.is_empty() {
      return Err(anyhow!("image reference '{s}' has empty tag"));
    }
    Ok(reference)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_repository_and_tag() {
    let reference: ImageReference =
      "123.dkr.ecr.us-east-1.amazonaws.com/app:abc1234"
        .parse()
        .unwrap();
    assert_eq!(
      reference.repository,
      "123.dkr.ecr.us-east-1.amazonaws.com/app"
    );
    assert_eq!(reference.tag, "abc1234");
  }

  #[test]
  fn untagged_reference_defaults_to_latest() {
    let reference: ImageReference = "repo/app".parse().unwrap();
    assert_eq!(reference.tag, LATEST_TAG);
  }

  #[test]
  fn registry_port_is_not_a_tag() {
    let reference: ImageReference =
      "registry:5000/app".parse().unwrap();
    assert_eq!(reference.repository, "registry:5000/app");
    assert_eq!(reference.tag, LATEST_TAG);

    let tagged: ImageReference =
      "registry:5000/app:v2".parse().unwrap();
    assert_eq!(tagged.repository, "registry:5000/app");
    assert_eq!(tagged.tag, "v2");
  }

  #[test]
  fn commit_hash_is_shortened() {
    let reference = ImageReference::from_commit(
      "repo/app",
      Some("abc1234def5678"),
    );
    assert_eq!(reference.tag, "abc1234");
    assert_eq!(reference.uri(), "repo/app:abc1234");
  }

  #[test]
  fn missing_commit_falls_back_to_latest() {
    assert_eq!(
      ImageReference::from_commit("repo/app", None).tag,
      LATEST_TAG
    );
    assert_eq!(
      ImageReference::from_commit("repo/app", Some("")).tag,
      LATEST_TAG
    );
  }

  #[test]
  fn empty_reference_is_rejected() {
    assert!("".parse::<ImageReference>().is_err());
    assert!("repo/app:".parse::<ImageReference>().is_err());
  }
}
