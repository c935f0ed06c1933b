mod newsletter;
